//! Role customization and role-guarded route configuration.
//!
//! # Environment Variables
//!
//! - `ROLE_MAPPINGS`: `source=target1|target2;other=` (empty target list drops the role)
//! - `PERMISSIONS_READER_ROLES` (default `permissions.reader,permissions.admin`)
//! - `PERMISSIONS_ADMIN_ROLES` (default `permissions.admin`)

use crate::error::ConfigError;
use crate::raw::RawConfig;

#[derive(Clone, Debug, Default)]
pub struct AuthorizationConfig {
    pub role_mappings: Vec<(String, Vec<String>)>,
    pub reader_roles: Vec<String>,
    pub admin_roles: Vec<String>,
}

impl AuthorizationConfig {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let role_mappings = match raw.get("ROLE_MAPPINGS") {
            Some(value) => parse_role_mappings(value)?,
            None => Vec::new(),
        };

        Ok(Self {
            role_mappings,
            reader_roles: raw.list(
                "PERMISSIONS_READER_ROLES",
                "permissions.reader,permissions.admin",
            ),
            admin_roles: raw.list("PERMISSIONS_ADMIN_ROLES", "permissions.admin"),
        })
    }
}

/// Parse the `ROLE_MAPPINGS` grammar into `(source, targets)` pairs.
pub fn parse_role_mappings(value: &str) -> Result<Vec<(String, Vec<String>)>, ConfigError> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (source, targets) = entry.split_once('=').ok_or_else(|| {
                ConfigError::invalid("ROLE_MAPPINGS", format!("missing '=' in entry: {entry}"))
            })?;

            let source = source.trim();
            if source.is_empty() {
                return Err(ConfigError::invalid(
                    "ROLE_MAPPINGS",
                    format!("empty source role in entry: {entry}"),
                ));
            }

            let targets = targets
                .split('|')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();

            Ok((source.to_string(), targets))
        })
        .collect()
}
