// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a list has at least one entry
    pub fn not_empty_list<T>(values: &[T], field: &str) -> Result<()> {
        if values.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} must contain at least one entry",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a number is within an inclusive range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {} (got {})",
                field, min, max, value
            )));
        }
        Ok(())
    }

    /// Validate URL format
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a valid URL",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a route path starts with a slash
    pub fn is_path(value: &str, field: &str) -> Result<()> {
        if !value.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must start with '/'",
                field
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("", "field").is_err());
        assert!(ConfigValidator::not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(ConfigValidator::in_range(0, 0, 10, "maxRetries").is_ok());
        assert!(ConfigValidator::in_range(10, 0, 10, "maxRetries").is_ok());

        let err = ConfigValidator::in_range(11, 0, 10, "maxRetries").unwrap_err();
        assert!(err.to_string().contains("between 0 and 10"));
        assert!(ConfigValidator::in_range(0, 1, 300, "timeoutSeconds").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(ConfigValidator::is_url("https://app.orgo.space/api/v1", "apiUrl").is_ok());
        assert!(ConfigValidator::is_url("app.orgo.space", "apiUrl").is_err());
    }

    #[test]
    fn test_list_and_path_validation() {
        let empty: Vec<String> = Vec::new();
        assert!(ConfigValidator::not_empty_list(&empty, "events").is_err());
        assert!(ConfigValidator::not_empty_list(&["user.created"], "events").is_ok());
        assert!(ConfigValidator::is_path("/webhook", "path").is_ok());
        assert!(ConfigValidator::is_path("webhook", "path").is_err());
    }
}
