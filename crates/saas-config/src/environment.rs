use crate::error::ConfigError;
use crate::raw::RawConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read `APP_ENVIRONMENT`, defaulting to development
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        match raw
            .get("APP_ENVIRONMENT")
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("development" | "dev") => Ok(Self::Development),
            Some("staging") => Ok(Self::Staging),
            Some("production" | "prod") => Ok(Self::Production),
            Some(other) => Err(ConfigError::invalid(
                "APP_ENVIRONMENT",
                format!("unknown environment: {other}"),
            )),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let env = |v: &str| Environment::from_raw(&RawConfig::from_pairs([("APP_ENVIRONMENT", v)]));

        assert_eq!(env("Production").unwrap(), Environment::Production);
        assert_eq!(env("prod").unwrap(), Environment::Production);
        assert_eq!(env("staging").unwrap(), Environment::Staging);
        assert_eq!(env("dev").unwrap(), Environment::Development);
        assert!(env("qa").is_err());
        assert_eq!(
            Environment::from_raw(&RawConfig::new()).unwrap(),
            Environment::Development
        );
    }
}
