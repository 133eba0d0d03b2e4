// Environment variable loading

use crate::{ConfigError, Result};
use std::env;
use std::str::FromStr;

/// Environment variable loader
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Full variable name for a key, with the prefix applied
    pub fn var_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = self.var_name(key);
        env::var(&full_key).map_err(|e| match e {
            env::VarError::NotPresent => ConfigError::KeyNotFound(full_key),
            other => ConfigError::EnvError(other),
        })
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Load a variable, treating unset and blank the same
    pub fn load_optional(&self, key: &str) -> Option<String> {
        self.load_var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Load a required, non-blank variable
    pub fn load_required(&self, key: &str) -> Result<String> {
        self.load_optional(key)
            .ok_or_else(|| ConfigError::KeyNotFound(self.var_name(key)))
    }

    /// Load and parse a variable, falling back to `default` when unset
    pub fn load_parsed_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.load_optional(key) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::ParseError {
                key: self.var_name(key),
                message: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// Load an optional parsed variable
    pub fn load_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.load_optional(key)
            .map(|raw| {
                raw.parse().map_err(|e: T::Err| ConfigError::ParseError {
                    key: self.var_name(key),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Load a boolean; accepts true/false, 1/0, yes/no, on/off
    pub fn load_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.load_optional(key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::ParseError {
                key: self.var_name(key),
                message: format!("expected a boolean, got {:?}", raw),
            }),
            None => Ok(default),
        }
    }

    /// Load a comma-separated list, dropping blank entries
    pub fn load_list(&self, key: &str) -> Vec<String> {
        self.load_optional(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe in edition 2024; tests that mutate the
    // environment live in tests/integration_test.rs with unique names.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::new(Some("ORGO_TEST".to_string()));
        let result = loader.load_var("MISSING_VAR_67890");

        assert!(matches!(result, Err(ConfigError::KeyNotFound(k)) if k == "ORGO_TEST_MISSING_VAR_67890"));
    }

    #[test]
    fn test_var_name_prefix() {
        let loader = EnvLoader::new(Some("ORGO".to_string()));
        assert_eq!(loader.var_name("api_url"), "ORGO_API_URL");

        let bare = EnvLoader::default();
        assert_eq!(bare.var_name("path"), "PATH");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_parsed_default_when_unset() {
        let loader = EnvLoader::new(Some("ORGO_TEST".to_string()));
        let value: u16 = loader.load_parsed_or("UNSET_NUMBER_4242", 30).unwrap();
        assert_eq!(value, 30);
        assert!(loader.load_list("UNSET_LIST_4242").is_empty());
    }
}
