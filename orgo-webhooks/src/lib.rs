//! Webhook ingress and subscription lifecycle for Orgo
//!
//! This crate turns Orgo webhook deliveries into workflow events and keeps the
//! matching remote subscription in step with the workflow's activation state.
//!
//! # Features
//!
//! - **Subscription Lifecycle**: Idempotent check/create/delete of the remote
//!   subscription, persisting only its id
//! - **Signature Verification**: The platform's rolling-hash signature, or
//!   HMAC-SHA256 when both sides opt in
//! - **Payload Normalization**: Required-field checks and a canonical
//!   [`EventEnvelope`]
//! - **Ingress Endpoint**: An axum router that verifies, normalizes and emits
//!   exactly one envelope per delivery
//! - **Administration**: List, inspect, update, test and delete subscriptions
//!
//! # Example: Activating a Trigger
//!
//! ```rust,no_run
//! use orgo_http_client::{HttpClient, HttpClientConfig};
//! use orgo_webhooks::{
//!     EventType, MemoryStore, OrgoTrigger, SubscriptionManager, TriggerOptions, WorkflowInfo,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(
//!         HttpClientConfig::builder()
//!             .base_url("https://app.orgo.space/api/v1")
//!             .api_token("my-token")
//!             .build(),
//!     )?;
//!     let manager = SubscriptionManager::new(Arc::new(client), Arc::new(MemoryStore::new()));
//!
//!     let options = TriggerOptions::builder()
//!         .event(EventType::ContractUserCreated)
//!         .build()?;
//!     let trigger = OrgoTrigger::new(
//!         options,
//!         WorkflowInfo::new("wf-1", "Contracts"),
//!         "https://hooks.example.com/webhook",
//!         Some("shared-secret".to_string()),
//!         manager,
//!     )?;
//!
//!     let id = trigger.activate().await?;
//!     println!("Subscribed as {}", id);
//!     Ok(())
//! }
//! ```
//!
//! # Example: Receiving Webhooks
//!
//! ```rust
//! use orgo_webhooks::{WebhookReceiver, WebhookSignature};
//! use std::collections::HashMap;
//!
//! let receiver = WebhookReceiver::new(true, Some("shared-secret".to_string()));
//!
//! let body = r#"{"id":"evt_1","event":"user.created","object":{"id":42}}"#;
//! let signature = WebhookSignature::new("shared-secret").sign(body);
//!
//! let mut headers = HashMap::new();
//! headers.insert("X-Webhook-Signature".to_string(), signature);
//!
//! let envelope = receiver.handle(body.as_bytes(), &headers).unwrap();
//! assert_eq!(envelope.event, "user.created");
//! ```

mod api;
mod config;
mod envelope;
mod error;
mod events;
mod lifecycle;
mod receiver;
pub mod server;
mod signature;
mod sink;
mod store;
mod subscription;
mod trigger;

pub use api::{DEFAULT_LIST_LIMIT, SubscriptionApi};
pub use config::{
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, TriggerOptions, TriggerOptionsBuilder,
    parse_events,
};
pub use envelope::{EventEnvelope, InboundPayload};
pub use error::WebhookError;
pub use events::{EntityType, EventType, Operation};
pub use lifecycle::{LifecycleState, SubscriptionManager};
pub use receiver::{WebhookReceiver, find_header};
pub use server::IngressState;
pub use signature::{SIGNATURE_HEADER, SignatureScheme, WebhookSignature, verify_signature};
pub use sink::{ChannelSink, EventSink};
pub use store::{FileStore, MemoryStore, ScopedStore, StaticDataStore, WEBHOOK_ID_KEY};
pub use subscription::{
    SUBSCRIPTIONS_PATH, SubscriptionId, SubscriptionPatch, SubscriptionRecord, SubscriptionRequest,
};
pub use trigger::{OrgoTrigger, WorkflowInfo};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
