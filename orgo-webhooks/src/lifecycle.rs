//! Subscription lifecycle
//!
//! A trigger owns at most one remote subscription. Its state lives on the
//! platform; this side keeps only the id under [`WEBHOOK_ID_KEY`], so the
//! state machine is derived from whether that pointer is set:
//!
//! ```text
//! Unregistered --create--> Registered --delete / confirmed gone--> Unregistered
//! ```
//!
//! None of these operations retry. Redelivery of events is the platform's
//! job, driven by the subscription's `maxRetries` and `timeoutSeconds`.

use crate::{
    Result, StaticDataStore, SubscriptionId, SubscriptionRequest, WEBHOOK_ID_KEY, WebhookError,
    subscription::SUBSCRIPTIONS_PATH,
};
use orgo_http_client::RestClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether a subscription pointer is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Unregistered,
    Registered(SubscriptionId),
}

impl LifecycleState {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Creates, checks and deletes the remote subscription for one trigger.
#[derive(Clone)]
pub struct SubscriptionManager {
    client: Arc<dyn RestClient>,
    store: Arc<dyn StaticDataStore>,
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("store", &self.store)
            .field("state", &self.state())
            .finish()
    }
}

impl SubscriptionManager {
    pub fn new(client: Arc<dyn RestClient>, store: Arc<dyn StaticDataStore>) -> Self {
        Self { client, store }
    }

    /// The stored remote id, if any.
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        let value = self.store.get(WEBHOOK_ID_KEY)?;
        let id = SubscriptionId::from_value(&value);
        if id.is_none() {
            warn!(value = %value, "Ignoring unreadable subscription pointer");
        }
        id
    }

    pub fn state(&self) -> LifecycleState {
        match self.subscription_id() {
            Some(id) => LifecycleState::Registered(id),
            None => LifecycleState::Unregistered,
        }
    }

    /// Whether the stored subscription still exists remotely.
    ///
    /// Without a pointer this returns `false` without touching the network.
    /// A 404/410 clears the pointer; any other failure leaves it in place.
    pub async fn check_exists(&self) -> bool {
        let Some(id) = self.subscription_id() else {
            debug!("No subscription pointer stored");
            return false;
        };

        match self.client.get_json(&id.path()).await {
            Ok(_) => {
                debug!(subscription_id = %id, "Subscription exists");
                true
            }
            Err(e) if e.is_not_found() => {
                info!(subscription_id = %id, "Subscription is gone, clearing pointer");
                if let Err(err) = self.store.remove(WEBHOOK_ID_KEY) {
                    warn!(subscription_id = %id, error = %err, "Failed to clear subscription pointer");
                }
                false
            }
            Err(e) => {
                warn!(subscription_id = %id, error = %e, "Could not confirm subscription");
                false
            }
        }
    }

    /// Register a new subscription and store its id.
    ///
    /// Returns `Ok(None)` when the platform answers 2xx without an `id`;
    /// nothing is stored in that case.
    pub async fn create(&self, request: &SubscriptionRequest) -> Result<Option<SubscriptionId>> {
        request.validate()?;
        let body = serde_json::to_value(request)?;

        let response = self
            .client
            .post_json(SUBSCRIPTIONS_PATH, Some(body))
            .await
            .map_err(|e| WebhookError::upstream("create", e))?;

        let id = match response.get("id") {
            None | Some(Value::Null) => {
                warn!(url = %request.url, "Subscription response did not include an id");
                return Ok(None);
            }
            Some(raw) => match SubscriptionId::from_value(raw) {
                Some(id) => id,
                None => {
                    warn!(url = %request.url, id = %raw, "Subscription response carried a malformed id");
                    return Ok(None);
                }
            },
        };

        self.store.set(WEBHOOK_ID_KEY, id.clone().into())?;
        info!(
            subscription_id = %id,
            url = %request.url,
            events = request.event_types.len(),
            "Created subscription"
        );
        Ok(Some(id))
    }

    /// Delete the stored subscription and clear the pointer.
    ///
    /// No pointer is a successful no-op. On failure the pointer is kept and
    /// `false` is returned.
    pub async fn delete(&self) -> bool {
        let Some(id) = self.subscription_id() else {
            return true;
        };

        if let Err(e) = self.client.delete_json(&id.path()).await {
            warn!(subscription_id = %id, error = %e, "Failed to delete subscription");
            return false;
        }

        match self.store.remove(WEBHOOK_ID_KEY) {
            Ok(_) => {
                info!(subscription_id = %id, "Deleted subscription");
                true
            }
            Err(e) => {
                warn!(subscription_id = %id, error = %e, "Deleted subscription but kept pointer");
                false
            }
        }
    }

    /// Make sure a subscription exists, creating one when the check fails.
    pub async fn activate(&self, request: &SubscriptionRequest) -> Result<SubscriptionId> {
        if self.check_exists().await
            && let Some(id) = self.subscription_id()
        {
            info!(subscription_id = %id, "Reusing existing subscription");
            return Ok(id);
        }

        self.create(request).await?.ok_or_else(|| WebhookError::Upstream {
            action: "create",
            message: "response did not include a subscription id".to_string(),
        })
    }

    /// Tear down at workflow deactivation.
    pub async fn deactivate(&self) -> bool {
        self.delete().await
    }
}
