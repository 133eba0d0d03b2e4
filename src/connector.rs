//! Building a trigger from configuration

use orgo_config::{ConfigError, OrgoConfig, TriggerSettings, Validate};
use orgo_http_client::{HttpClient, HttpClientConfig, HttpClientError, RestClient};
use orgo_webhooks::{
    FileStore, OrgoTrigger, ScopedStore, SignatureScheme, StaticDataStore, SubscriptionManager,
    TriggerOptions, WebhookError, WorkflowInfo, parse_events,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while assembling the connector
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Http(#[from] HttpClientError),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;

/// REST client for the configured API.
pub fn http_client(config: &OrgoConfig) -> Result<HttpClient> {
    let client_config = HttpClientConfig::builder()
        .base_url(&config.credentials.api_url)
        .api_token(&config.credentials.api_token)
        .timeout(Duration::from_secs(config.server.http_timeout_secs))
        .build();
    Ok(HttpClient::new(client_config)?)
}

/// Validated trigger options from settings.
pub fn trigger_options(
    settings: &TriggerSettings,
    scheme: SignatureScheme,
) -> Result<TriggerOptions> {
    settings.validate()?;
    let events = parse_events(settings.events.as_slice())?;

    Ok(TriggerOptions::builder()
        .events(events)
        .verify_signature(settings.verify_signature)
        .max_retries(settings.max_retries)
        .timeout_seconds(settings.timeout_seconds)
        .signature_scheme(scheme)
        .build()?)
}

/// Public URL deliveries are sent to.
///
/// Falls back to the local bind address when no public URL is configured.
pub fn target_url(config: &OrgoConfig) -> String {
    match &config.trigger.webhook_url {
        Some(url) => url.clone(),
        None => format!("http://{}{}", config.server.bind, config.server.path),
    }
}

/// The state file, scoped to the configured workflow.
pub fn open_store(config: &OrgoConfig) -> Result<Arc<dyn StaticDataStore>> {
    let file = FileStore::open(&config.server.state_file)?;
    Ok(Arc::new(ScopedStore::new(
        Arc::new(file),
        config.trigger.workflow_id.clone(),
    )))
}

/// Assemble the trigger for the configured workflow.
pub fn build_trigger(
    config: &OrgoConfig,
    client: Arc<dyn RestClient>,
    store: Arc<dyn StaticDataStore>,
    scheme: SignatureScheme,
) -> Result<OrgoTrigger> {
    let options = trigger_options(&config.trigger, scheme)?;
    let workflow = WorkflowInfo::new(
        config.trigger.workflow_id.clone(),
        config.trigger.workflow_name.clone(),
    );

    Ok(OrgoTrigger::new(
        options,
        workflow,
        target_url(config),
        config.credentials.webhook_secret.clone(),
        SubscriptionManager::new(client, store),
    )?)
}
