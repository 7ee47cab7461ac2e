//! Vault-backed secrets.
//!
//! The vault is shared by every service of the platform, so each service only
//! loads the secrets whose name starts with its own prefix. Names follow the
//! vault's rules (alphanumerics and dashes); the prefix and its dash are
//! stripped and the rest is turned into a configuration key:
//!
//! ```text
//! permissions-api-key            -> API_KEY
//! permissions-database--url      -> DATABASE_URL
//! graph-client-secret            -> (skipped, other service)
//! ```
//!
//! [`DirectorySecretStore`] reads secrets the vault driver mounts into the
//! container, one file per secret.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::raw::RawConfig;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to read secrets from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone)]
pub struct Secret {
    pub name: String,
    pub value: String,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

pub trait SecretStore: Send + Sync {
    fn list_secrets(&self) -> Result<Vec<Secret>, SecretError>;
}

#[derive(Debug, Clone)]
pub struct DirectorySecretStore {
    dir: PathBuf,
}

impl DirectorySecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SecretStore for DirectorySecretStore {
    fn list_secrets(&self) -> Result<Vec<Secret>, SecretError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| SecretError::Io { path, source }
        };

        let mut secrets = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err(&self.dir))? {
            let entry = entry.map_err(io_err(&self.dir))?;
            let path = entry.path();

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Mount drivers keep bookkeeping entries such as `..data`
            if name.starts_with('.') || !path.is_file() {
                continue;
            }

            let value = fs::read_to_string(&path).map_err(io_err(&path))?;
            secrets.push(Secret {
                name: name.to_string(),
                value: value.trim().to_string(),
            });
        }

        Ok(secrets)
    }
}

/// Selects the secrets belonging to one service and names their config keys.
#[derive(Debug, Clone)]
pub struct PrefixSecretManager {
    prefix: String,
}

impl PrefixSecretManager {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: format!("{}-", prefix.to_ascii_lowercase()),
        }
    }

    pub fn load(&self, secret_name: &str) -> bool {
        secret_name.len() > self.prefix.len()
            && secret_name.to_ascii_lowercase().starts_with(&self.prefix)
    }

    pub fn config_key(&self, secret_name: &str) -> String {
        secret_name[self.prefix.len()..]
            .replace("--", "_")
            .replace('-', "_")
            .to_ascii_uppercase()
    }
}

/// Collect the secrets accepted by `manager` into a [`RawConfig`].
pub fn load_secrets(
    store: &dyn SecretStore,
    manager: &PrefixSecretManager,
) -> Result<RawConfig, SecretError> {
    let mut raw = RawConfig::new();

    for secret in store.list_secrets()? {
        if !manager.load(&secret.name) {
            debug!(name = %secret.name, "Skipping secret for another service");
            continue;
        }
        raw.set(manager.config_key(&secret.name), secret.value);
    }

    Ok(raw)
}
