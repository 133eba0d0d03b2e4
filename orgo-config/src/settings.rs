// Typed settings for the Orgo trigger

use crate::{ConfigValidator, EnvLoader, Result, Validate};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Prefix for every environment variable read by [`OrgoConfig::from_env`].
pub const ENV_PREFIX: &str = "ORGO";

/// Default Orgo API base URL.
pub const DEFAULT_API_URL: &str = "https://app.orgo.space/api/v1";

/// Default delivery retries requested from the platform.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Default delivery timeout requested from the platform.
pub const DEFAULT_TIMEOUT_SECONDS: u16 = 30;

/// API credentials.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Base URL of the Orgo API.
    pub api_url: String,

    /// Token sent as the `Api-Token` header.
    #[serde(skip_serializing)]
    pub api_token: String,

    /// Shared secret used to verify webhook signatures.
    #[serde(skip_serializing)]
    pub webhook_secret: Option<String>,

    /// Tenant the token belongs to, when known.
    pub tenant_id: Option<u64>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "***"))
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the environment.
    pub fn from_loader(loader: &EnvLoader) -> Result<Self> {
        Ok(Self {
            api_url: loader.load_var_or("API_URL", DEFAULT_API_URL),
            api_token: loader.load_required("API_TOKEN")?,
            webhook_secret: loader.load_optional("WEBHOOK_SECRET"),
            tenant_id: loader.load_parsed("TENANT_ID")?.filter(|id| *id != 0),
        })
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.api_url, "apiUrl")?;
        ConfigValidator::not_empty(&self.api_token, "apiToken")
    }
}

/// Per-trigger options.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerSettings {
    /// Event types to subscribe to (`entity.operation`).
    pub events: Vec<String>,

    /// Whether inbound signatures are checked.
    pub verify_signature: bool,

    /// Redelivery attempts the platform should make (0-10).
    pub max_retries: u8,

    /// Per-delivery timeout the platform should use (1-300 seconds).
    pub timeout_seconds: u16,

    /// Public URL the platform delivers to.
    pub webhook_url: Option<String>,

    /// Identifier of the workflow owning the subscription.
    pub workflow_id: String,

    /// Display name of the workflow owning the subscription.
    pub workflow_name: String,
}

impl TriggerSettings {
    /// Load trigger options from the environment.
    pub fn from_loader(loader: &EnvLoader) -> Result<Self> {
        Ok(Self {
            events: loader.load_list("EVENTS"),
            verify_signature: loader.load_bool_or("VERIFY_SIGNATURE", true)?,
            max_retries: loader.load_parsed_or("MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            timeout_seconds: loader.load_parsed_or("TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            webhook_url: loader.load_optional("WEBHOOK_URL"),
            workflow_id: loader.load_var_or("WORKFLOW_ID", "default"),
            workflow_name: loader.load_var_or("WORKFLOW_NAME", "Orgo Trigger"),
        })
    }
}

impl Validate for TriggerSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty_list(&self.events, "events")?;
        ConfigValidator::in_range(self.max_retries, 0, 10, "maxRetries")?;
        ConfigValidator::in_range(self.timeout_seconds, 1, 300, "timeoutSeconds")?;
        if let Some(url) = &self.webhook_url {
            ConfigValidator::is_url(url, "webhookUrl")?;
        }
        Ok(())
    }
}

/// Local HTTP server and persistence settings.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSettings {
    /// Address the ingress endpoint binds to.
    pub bind: SocketAddr,

    /// Route the ingress endpoint is mounted on.
    pub path: String,

    /// File holding the persisted subscription pointer.
    pub state_file: PathBuf,

    /// Timeout for outbound API calls, distinct from the platform's delivery timeout.
    pub http_timeout_secs: u64,
}

impl ServerSettings {
    /// Load server settings from the environment.
    pub fn from_loader(loader: &EnvLoader) -> Result<Self> {
        Ok(Self {
            bind: loader.load_parsed_or("BIND", SocketAddr::from(([127, 0, 0, 1], 5678)))?,
            path: loader.load_var_or("WEBHOOK_PATH", "/webhook"),
            state_file: PathBuf::from(loader.load_var_or("STATE_FILE", "orgo-state.json")),
            http_timeout_secs: loader.load_parsed_or("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_path(&self.path, "webhookPath")?;
        ConfigValidator::in_range(self.http_timeout_secs, 1, 3600, "httpTimeoutSecs")
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Serialize)]
pub struct OrgoConfig {
    pub credentials: Credentials,
    pub trigger: TriggerSettings,
    pub server: ServerSettings,
}

impl OrgoConfig {
    /// Load `.env` (if present) and then the `ORGO_*` environment.
    pub fn from_env() -> Result<Self> {
        crate::load_dotenv(None)?;
        Self::from_loader(&EnvLoader::new(Some(ENV_PREFIX.to_string())))
    }

    /// Load from an explicit loader.
    ///
    /// Credentials and server settings are validated here; trigger options
    /// are only validated by commands that register a subscription.
    pub fn from_loader(loader: &EnvLoader) -> Result<Self> {
        let config = Self {
            credentials: Credentials::from_loader(loader)?,
            trigger: TriggerSettings::from_loader(loader)?,
            server: ServerSettings::from_loader(loader)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for OrgoConfig {
    fn validate(&self) -> Result<()> {
        self.credentials.validate()?;
        self.server.validate()
    }
}
