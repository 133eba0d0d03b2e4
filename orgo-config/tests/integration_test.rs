//! Integration tests for orgo-config

use orgo_config::*;
use std::env;
use std::io::Write;

// Each test uses its own prefix so parallel tests never see each other's
// variables.
fn set(prefix: &str, key: &str, value: &str) {
    unsafe {
        env::set_var(format!("{}_{}", prefix, key), value);
    }
}

fn clear(prefix: &str, keys: &[&str]) {
    for key in keys {
        unsafe {
            env::remove_var(format!("{}_{}", prefix, key));
        }
    }
}

#[test]
fn test_full_config_from_env() {
    let prefix = "ORGO_IT_FULL";
    set(prefix, "API_URL", "http://localhost:3000/api/v1");
    set(prefix, "API_TOKEN", "token-123");
    set(prefix, "WEBHOOK_SECRET", "shh");
    set(prefix, "TENANT_ID", "42");
    set(prefix, "EVENTS", "user.created, contract_user.created ,");
    set(prefix, "VERIFY_SIGNATURE", "false");
    set(prefix, "MAX_RETRIES", "0");
    set(prefix, "TIMEOUT_SECONDS", "120");
    set(prefix, "WEBHOOK_URL", "https://hooks.example.com/webhook");
    set(prefix, "BIND", "0.0.0.0:8080");

    let loader = EnvLoader::new(Some(prefix.to_string()));
    let config = OrgoConfig::from_loader(&loader).unwrap();

    assert_eq!(config.credentials.api_url, "http://localhost:3000/api/v1");
    assert_eq!(config.credentials.api_token, "token-123");
    assert_eq!(config.credentials.webhook_secret.as_deref(), Some("shh"));
    assert_eq!(config.credentials.tenant_id, Some(42));
    assert_eq!(
        config.trigger.events,
        vec!["user.created".to_string(), "contract_user.created".to_string()]
    );
    assert!(!config.trigger.verify_signature);
    assert_eq!(config.trigger.max_retries, 0);
    assert_eq!(config.trigger.timeout_seconds, 120);
    assert_eq!(config.server.bind.port(), 8080);
    assert_eq!(config.server.path, "/webhook");
    assert!(config.trigger.validate().is_ok());

    clear(
        prefix,
        &[
            "API_URL",
            "API_TOKEN",
            "WEBHOOK_SECRET",
            "TENANT_ID",
            "EVENTS",
            "VERIFY_SIGNATURE",
            "MAX_RETRIES",
            "TIMEOUT_SECONDS",
            "WEBHOOK_URL",
            "BIND",
        ],
    );
}

#[test]
fn test_defaults() {
    let prefix = "ORGO_IT_DEFAULTS";
    set(prefix, "API_TOKEN", "token");

    let loader = EnvLoader::new(Some(prefix.to_string()));
    let config = OrgoConfig::from_loader(&loader).unwrap();

    assert_eq!(config.credentials.api_url, DEFAULT_API_URL);
    assert!(config.credentials.webhook_secret.is_none());
    assert!(config.trigger.verify_signature);
    assert_eq!(config.trigger.max_retries, DEFAULT_MAX_RETRIES);
    assert_eq!(config.trigger.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    // No events selected yet, so the trigger itself is not valid.
    assert!(config.trigger.validate().is_err());

    clear(prefix, &["API_TOKEN"]);
}

#[test]
fn test_missing_token() {
    let loader = EnvLoader::new(Some("ORGO_IT_NO_TOKEN".to_string()));
    let err = OrgoConfig::from_loader(&loader).unwrap_err();

    assert!(matches!(err, ConfigError::KeyNotFound(ref k) if k == "ORGO_IT_NO_TOKEN_API_TOKEN"));
}

#[test]
fn test_blank_secret_is_absent() {
    let prefix = "ORGO_IT_BLANK";
    set(prefix, "API_TOKEN", "token");
    set(prefix, "WEBHOOK_SECRET", "   ");

    let loader = EnvLoader::new(Some(prefix.to_string()));
    let config = OrgoConfig::from_loader(&loader).unwrap();
    assert!(config.credentials.webhook_secret.is_none());

    clear(prefix, &["API_TOKEN", "WEBHOOK_SECRET"]);
}

#[test]
fn test_invalid_number() {
    let prefix = "ORGO_IT_BAD_NUMBER";
    set(prefix, "API_TOKEN", "token");
    set(prefix, "MAX_RETRIES", "lots");

    let loader = EnvLoader::new(Some(prefix.to_string()));
    let err = OrgoConfig::from_loader(&loader).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));

    clear(prefix, &["API_TOKEN", "MAX_RETRIES"]);
}

#[test]
fn test_load_dotenv_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ORGO_IT_DOTENV_API_TOKEN=from-file").unwrap();

    load_dotenv(Some(file.path())).unwrap();

    let loader = EnvLoader::new(Some("ORGO_IT_DOTENV".to_string()));
    assert_eq!(loader.load_required("API_TOKEN").unwrap(), "from-file");

    clear("ORGO_IT_DOTENV", &["API_TOKEN"]);
}

#[test]
fn test_missing_dotenv_file_is_an_error() {
    let result = load_dotenv(Some(std::path::Path::new("/nonexistent/orgo/.env")));
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
