// Configuration management for the Orgo webhook trigger

pub mod env;
pub mod error;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use settings::{
    Credentials, DEFAULT_API_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, ENV_PREFIX,
    OrgoConfig, ServerSettings, TriggerSettings,
};
pub use validation::{ConfigValidator, Validate};

use std::path::Path;

/// Load a `.env` file into the process environment.
///
/// Without a path, a missing `.env` in the working directory is not an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}
