//! # SaaS Config
//!
//! Configuration types for the SaaS permissions service.
//!
//! Configuration is read from a flat key/value map ([`RawConfig`]) built from
//! the process environment. In production, secrets from the managed vault are
//! overlaid on top of it before the typed sections are bound:
//!
//! - [`server`]: listen address, HTTPS enforcement, forwarded headers
//! - [`database`]: PostgreSQL connection settings
//! - [`identity`]: API key and bearer-token validation settings
//! - [`authorization`]: role mappings and per-route role lists
//! - [`secrets`]: vault-backed secret loading with a name prefix
//!
//! # Example
//!
//! ```ignore
//! use saas_config::Settings;
//!
//! dotenvy::dotenv().ok();
//! let settings = Settings::load()?;
//! println!("listening on {}", settings.server.addr());
//! ```

pub mod authorization;
pub mod database;
pub mod environment;
pub mod error;
pub mod identity;
pub mod raw;
pub mod secrets;
pub mod server;

// Re-export commonly used types at crate root
pub use authorization::AuthorizationConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use error::ConfigError;
pub use identity::{AppSettings, IdentityOptions};
pub use raw::RawConfig;
pub use secrets::{DirectorySecretStore, PrefixSecretManager, SecretError, SecretStore};
pub use server::{ForwardedHeadersConfig, HttpsConfig, ServerConfig};

use std::path::PathBuf;

use tracing::info;

/// Where vault secrets are read from and which of them belong to this service.
#[derive(Clone, Debug)]
pub struct KeyVaultConfig {
    pub secrets_dir: Option<PathBuf>,
    pub prefix: String,
}

impl KeyVaultConfig {
    pub fn from_raw(raw: &RawConfig) -> Self {
        Self {
            secrets_dir: raw.get("SECRETS_DIR").map(PathBuf::from),
            prefix: raw.get_or("SECRETS_PREFIX", "permissions"),
        }
    }
}

/// All typed configuration sections of the service.
#[derive(Clone, Debug)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppSettings,
    pub identity: IdentityOptions,
    pub key_vault: KeyVaultConfig,
    pub https: HttpsConfig,
    pub forwarded_headers: ForwardedHeadersConfig,
    pub authorization: AuthorizationConfig,
}

impl Settings {
    /// Bind every section from an already assembled [`RawConfig`].
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let environment = Environment::from_raw(raw)?;

        Ok(Self {
            environment,
            server: ServerConfig::from_raw(raw)?,
            database: DatabaseConfig::from_raw(raw)?,
            app: AppSettings::from_raw(raw)?,
            identity: IdentityOptions::from_raw(raw)?,
            key_vault: KeyVaultConfig::from_raw(raw),
            https: HttpsConfig::from_raw(raw, environment)?,
            forwarded_headers: ForwardedHeadersConfig::from_raw(raw)?,
            authorization: AuthorizationConfig::from_raw(raw)?,
        })
    }

    /// Read the process environment and bind it with [`Settings::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(RawConfig::from_env())
    }

    /// Overlay vault secrets on `raw` in production, then bind.
    ///
    /// Outside production secrets are expected to come from the environment
    /// (for example a local `.env` file).
    pub fn load_from(mut raw: RawConfig) -> Result<Self, ConfigError> {
        let environment = Environment::from_raw(&raw)?;

        if environment.is_production() {
            let key_vault = KeyVaultConfig::from_raw(&raw);
            let dir = key_vault
                .secrets_dir
                .ok_or(ConfigError::Missing("SECRETS_DIR"))?;

            let store = DirectorySecretStore::new(dir);
            let manager = PrefixSecretManager::new(&key_vault.prefix);
            let secrets = secrets::load_secrets(&store, &manager)?;

            info!(count = secrets.len(), prefix = %key_vault.prefix, "Loaded vault secrets");
            raw.merge(secrets);
        }

        Self::from_raw(&raw)
    }
}
