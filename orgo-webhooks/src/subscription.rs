//! Remote subscription resource types

use crate::{EventType, Result, WebhookError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Collection path for webhook subscriptions.
pub const SUBSCRIPTIONS_PATH: &str = "/webhook_subscriptions";

/// Inclusive bounds accepted by the platform.
pub const MAX_RETRIES_RANGE: (u8, u8) = (0, 10);
pub const TIMEOUT_SECONDS_RANGE: (u16, u16) = (1, 300);

/// Identifier assigned by the platform. Numeric or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionId {
    Number(i64),
    Text(String),
}

impl SubscriptionId {
    /// Read an id from a JSON value; `null`, empty strings and other shapes yield `None`.
    ///
    /// Integral floats such as `12.0` become numbers. Numbers outside the
    /// `i64` range keep their JSON text.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(id) => Self::Number(id),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Self::Number(f as i64)
                    }
                    _ => Self::Text(n.to_string()),
                },
            }),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Path of this subscription's resource.
    pub fn path(&self) -> String {
        format!("{}/{}", SUBSCRIPTIONS_PATH, self)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SubscriptionId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for SubscriptionId {
    fn from(id: &str) -> Self {
        id.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(id.to_string()))
    }
}

impl From<SubscriptionId> for Value {
    fn from(id: SubscriptionId) -> Self {
        match id {
            SubscriptionId::Number(n) => Value::from(n),
            SubscriptionId::Text(s) => Value::String(s),
        }
    }
}

/// Body of `POST /webhook_subscriptions`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub name: String,
    pub url: String,
    pub event_types: Vec<EventType>,
    pub secret: Option<String>,
    pub is_active: bool,
    pub max_retries: u8,
    pub timeout_seconds: u16,
    pub description: String,
}

impl fmt::Debug for SubscriptionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRequest")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("event_types", &self.event_types)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("is_active", &self.is_active)
            .field("max_retries", &self.max_retries)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("description", &self.description)
            .finish()
    }
}

impl SubscriptionRequest {
    /// Reject bodies the platform would refuse, before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.event_types.is_empty() {
            return Err(WebhookError::Config(
                "at least one event type is required".to_string(),
            ));
        }
        check_range("maxRetries", self.max_retries, MAX_RETRIES_RANGE)?;
        check_range("timeoutSeconds", self.timeout_seconds, TIMEOUT_SECONDS_RANGE)?;
        url::Url::parse(&self.url)
            .map_err(|e| WebhookError::Config(format!("invalid webhook url {:?}: {}", self.url, e)))?;
        Ok(())
    }
}

/// A subscription as the platform returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: SubscriptionId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Kept as strings; the platform may know events this crate does not.
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update for `PATCH /webhook_subscriptions/{id}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<EventType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubscriptionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn event_types(mut self, events: Vec<EventType>) -> Self {
        self.event_types = Some(events);
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn max_retries(mut self, retries: u8) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn timeout_seconds(mut self, seconds: u16) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Range-check the fields that are set.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(WebhookError::Config("update has no fields set".to_string()));
        }
        if matches!(&self.event_types, Some(events) if events.is_empty()) {
            return Err(WebhookError::Config(
                "at least one event type is required".to_string(),
            ));
        }
        if let Some(retries) = self.max_retries {
            check_range("maxRetries", retries, MAX_RETRIES_RANGE)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            check_range("timeoutSeconds", timeout, TIMEOUT_SECONDS_RANGE)?;
        }
        Ok(())
    }
}

pub(crate) fn check_range<T>(field: &str, value: T, (min, max): (T, T)) -> Result<()>
where
    T: PartialOrd + fmt::Display,
{
    if value < min || value > max {
        return Err(WebhookError::Config(format!(
            "{} must be between {} and {} (got {})",
            field, min, max, value
        )));
    }
    Ok(())
}
