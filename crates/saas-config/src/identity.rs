//! Caller identification: the service API key and bearer-token validation.

use std::fmt;

use crate::error::ConfigError;
use crate::raw::RawConfig;

/// Application settings shared by every caller of the service.
#[derive(Clone)]
pub struct AppSettings {
    /// Expected value of the `x-api-key` header
    pub api_key: String,
}

impl AppSettings {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: raw.require("API_KEY")?,
        })
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Settings used to validate bearer tokens on role-guarded routes.
#[derive(Clone)]
pub struct IdentityOptions {
    pub signing_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Lifetime in seconds of tokens issued by this service
    pub token_expiry: i64,
}

impl IdentityOptions {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            signing_secret: raw.require("JWT_SIGNING_SECRET")?,
            issuer: raw.get("JWT_ISSUER").map(str::to_string),
            audience: raw.get("JWT_AUDIENCE").map(str::to_string),
            token_expiry: raw.parse_or("JWT_TOKEN_EXPIRY", 3600)?,
        })
    }
}

impl fmt::Debug for IdentityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityOptions")
            .field("signing_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_options() {
        let raw = RawConfig::from_pairs([
            ("JWT_SIGNING_SECRET", "secret"),
            ("JWT_ISSUER", "https://login.example.com"),
        ]);
        let identity = IdentityOptions::from_raw(&raw).unwrap();

        assert_eq!(identity.issuer.as_deref(), Some("https://login.example.com"));
        assert_eq!(identity.audience, None);
        assert_eq!(identity.token_expiry, 3600);
        assert!(!format!("{identity:?}").contains("\"secret\""));
    }

    #[test]
    fn test_app_settings_debug_redacts_key() {
        let settings = AppSettings::from_raw(&RawConfig::from_pairs([("API_KEY", "k-123")])).unwrap();
        assert!(!format!("{settings:?}").contains("k-123"));
    }
}
