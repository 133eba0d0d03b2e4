//! Administration calls for webhook subscriptions
//!
//! These are plain request/response wrappers. Unlike
//! [`SubscriptionManager`](crate::SubscriptionManager) they never touch the
//! stored pointer.

use crate::{
    Result, SubscriptionId, SubscriptionPatch, SubscriptionRecord, SubscriptionRequest,
    WebhookError, subscription::SUBSCRIPTIONS_PATH,
};
use orgo_http_client::RestClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Page size used when none is given.
pub const DEFAULT_LIST_LIMIT: u32 = 25;

/// Subscription administration over the Orgo REST API
#[derive(Clone)]
pub struct SubscriptionApi {
    client: Arc<dyn RestClient>,
}

impl SubscriptionApi {
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self { client }
    }

    /// Fetch one subscription.
    pub async fn get(&self, id: &SubscriptionId) -> Result<SubscriptionRecord> {
        let value = self.client.get_json(&id.path()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// List subscriptions, at most `limit` of them.
    ///
    /// Accepts either a bare array or an object wrapping it in `data`.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<SubscriptionRecord>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let path = format!("{}?limit={}", SUBSCRIPTIONS_PATH, limit);
        let value = self.client.get_json(&path).await?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(WebhookError::Payload(
                        "subscription list response has no data array".to_string(),
                    ));
                }
            },
            Value::Null => Vec::new(),
            _ => {
                return Err(WebhookError::Payload(
                    "unexpected subscription list response".to_string(),
                ));
            }
        };

        debug!(count = items.len(), limit, "Listed subscriptions");
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(WebhookError::from))
            .collect()
    }

    /// Create a subscription without recording it anywhere.
    pub async fn create(&self, request: &SubscriptionRequest) -> Result<SubscriptionRecord> {
        request.validate()?;
        let value = self
            .client
            .post_json(SUBSCRIPTIONS_PATH, Some(serde_json::to_value(request)?))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Change selected fields of a subscription.
    pub async fn update(
        &self,
        id: &SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<SubscriptionRecord> {
        patch.validate()?;
        let value = self
            .client
            .patch_json(&id.path(), serde_json::to_value(patch)?)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a subscription.
    pub async fn delete(&self, id: &SubscriptionId) -> Result<()> {
        self.client.delete_json(&id.path()).await?;
        Ok(())
    }

    /// Ask the platform to send a test delivery.
    pub async fn test(&self, id: &SubscriptionId) -> Result<Value> {
        Ok(self
            .client
            .post_json(&format!("{}/test", id.path()), None)
            .await?)
    }

    /// Return the account the token belongs to.
    pub async fn whoami(&self) -> Result<Value> {
        Ok(self.client.get_json("/me").await?)
    }
}
