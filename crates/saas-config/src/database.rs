use std::fmt;

use crate::error::ConfigError;
use crate::raw::RawConfig;

/// PostgreSQL connection settings.
///
/// `DATABASE_URL` is required; `DATABASE_MAX_CONNECTIONS` defaults to 10.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url: raw.require("DATABASE_URL")?,
            max_connections: raw.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }
}

// The connection string usually embeds a password.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
