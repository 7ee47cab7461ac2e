//! Flat key/value configuration source.
//!
//! Keys use the environment variable convention (`DATABASE_URL`, `API_KEY`).
//! Blank values are treated as absent.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Default)]
pub struct RawConfig {
    values: HashMap<String, String>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment
    pub fn from_env() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of `self`; keys present in both take `other`'s value
    pub fn merge(&mut self, other: RawConfig) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key)
            .map(str::to_string)
            .ok_or(ConfigError::Missing(key))
    }

    pub fn parse_opt<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|v| v.parse::<T>().map_err(|e| ConfigError::invalid(key, e.to_string())))
            .transpose()
    }

    pub fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }

    pub fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key).map(str::to_ascii_lowercase).as_deref() {
            None => Ok(default),
            Some("true" | "1" | "yes") => Ok(true),
            Some("false" | "0" | "no") => Ok(false),
            Some(other) => Err(ConfigError::invalid(key, format!("not a boolean: {other}"))),
        }
    }

    /// Comma-separated list, falling back to `default` when the key is absent
    pub fn list(&self, key: &str, default: &str) -> Vec<String> {
        self.get(key)
            .unwrap_or(default)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

// Values may hold secrets, so only the key count is printed.
impl fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawConfig")
            .field("keys", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let raw = RawConfig::from_pairs([("A", "  "), ("B", " value ")]);

        assert_eq!(raw.get("A"), None);
        assert_eq!(raw.get("B"), Some("value"));
        assert!(matches!(raw.require("A"), Err(ConfigError::Missing("A"))));
    }

    #[test]
    fn test_merge_overrides() {
        let mut raw = RawConfig::from_pairs([("API_KEY", "from-env"), ("PORT", "8080")]);
        raw.merge(RawConfig::from_pairs([("API_KEY", "from-vault")]));

        assert_eq!(raw.get("API_KEY"), Some("from-vault"));
        assert_eq!(raw.get("PORT"), Some("8080"));
    }

    #[test]
    fn test_parse() {
        let raw = RawConfig::from_pairs([("PORT", "8080"), ("BAD", "eighty")]);

        assert_eq!(raw.parse_or::<u16>("PORT", 3000).unwrap(), 8080);
        assert_eq!(raw.parse_or::<u16>("MISSING", 3000).unwrap(), 3000);
        assert!(matches!(
            raw.parse_or::<u16>("BAD", 3000),
            Err(ConfigError::Invalid { key: "BAD", .. })
        ));
    }

    #[test]
    fn test_flag() {
        let raw = RawConfig::from_pairs([("ON", "TRUE"), ("OFF", "0"), ("WAT", "maybe")]);

        assert!(raw.flag("ON", false).unwrap());
        assert!(!raw.flag("OFF", true).unwrap());
        assert!(raw.flag("MISSING", true).unwrap());
        assert!(raw.flag("WAT", true).is_err());
    }

    #[test]
    fn test_list() {
        let raw = RawConfig::from_pairs([("ROLES", " a, b ,,c ")]);

        assert_eq!(raw.list("ROLES", "x"), vec!["a", "b", "c"]);
        assert_eq!(raw.list("MISSING", "x,y"), vec!["x", "y"]);
    }

    #[test]
    fn test_debug_hides_values() {
        let raw = RawConfig::from_pairs([("API_KEY", "super-secret")]);
        assert!(!format!("{raw:?}").contains("super-secret"));
    }
}
