use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    Secrets(#[from] SecretError),
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
