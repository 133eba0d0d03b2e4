//! Binding of one workflow to one Orgo subscription

use crate::{
    LifecycleState, Result, SubscriptionId, SubscriptionManager, SubscriptionRequest,
    TriggerOptions, WebhookError, WebhookReceiver,
};
use std::sync::Arc;
use tracing::info;

/// Identity of the workflow that owns the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowInfo {
    pub id: String,
    pub name: String,
}

impl WorkflowInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An Orgo trigger: activation and deactivation drive the subscription
/// lifecycle, deliveries go through the receiver.
#[derive(Debug, Clone)]
pub struct OrgoTrigger {
    options: TriggerOptions,
    workflow: WorkflowInfo,
    target_url: String,
    secret: Option<String>,
    manager: SubscriptionManager,
    receiver: Arc<WebhookReceiver>,
}

impl OrgoTrigger {
    /// Bind `workflow` to the ingress endpoint at `target_url`.
    pub fn new(
        options: TriggerOptions,
        workflow: WorkflowInfo,
        target_url: impl Into<String>,
        secret: Option<String>,
        manager: SubscriptionManager,
    ) -> Result<Self> {
        options.validate()?;

        let target_url = target_url.into();
        url::Url::parse(&target_url).map_err(|e| {
            WebhookError::Config(format!("invalid webhook url {:?}: {}", target_url, e))
        })?;

        let secret = secret.filter(|s| !s.is_empty());
        let receiver = WebhookReceiver::new(options.verify_signature, secret.clone())
            .with_scheme(options.signature_scheme);

        Ok(Self {
            options,
            workflow,
            target_url,
            secret,
            manager,
            receiver: Arc::new(receiver),
        })
    }

    /// Body sent when the subscription is created.
    pub fn subscription_request(&self) -> SubscriptionRequest {
        SubscriptionRequest {
            name: format!("Workflow: {}", self.workflow.name),
            url: self.target_url.clone(),
            event_types: self.options.events.clone(),
            secret: self.secret.clone(),
            is_active: true,
            max_retries: self.options.max_retries,
            timeout_seconds: self.options.timeout_seconds,
            description: format!(
                "Created by workflow \"{}\" ({})",
                self.workflow.name, self.workflow.id
            ),
        }
    }

    /// Workflow activation: reuse the stored subscription or create one.
    pub async fn activate(&self) -> Result<SubscriptionId> {
        let id = self.manager.activate(&self.subscription_request()).await?;
        info!(
            workflow_id = %self.workflow.id,
            subscription_id = %id,
            verifies = self.receiver.verifies(),
            "Trigger active"
        );
        Ok(id)
    }

    /// Workflow deactivation: delete the subscription.
    pub async fn deactivate(&self) -> bool {
        self.manager.deactivate().await
    }

    pub async fn check_exists(&self) -> bool {
        self.manager.check_exists().await
    }

    pub fn state(&self) -> LifecycleState {
        self.manager.state()
    }

    /// Receiver to mount on the ingress route.
    pub fn receiver(&self) -> Arc<WebhookReceiver> {
        self.receiver.clone()
    }

    pub fn manager(&self) -> &SubscriptionManager {
        &self.manager
    }

    pub fn options(&self) -> &TriggerOptions {
        &self.options
    }

    pub fn workflow(&self) -> &WorkflowInfo {
        &self.workflow
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}
