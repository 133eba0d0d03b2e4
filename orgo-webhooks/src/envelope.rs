//! Inbound payload normalization
//!
//! Orgo deliveries are loosely typed JSON. [`InboundPayload`] accepts whatever
//! shape arrives; [`EventEnvelope::from_slice`] checks the required fields and
//! produces the canonical record handed to the workflow.

use crate::{EventType, Result, WebhookError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A delivery body as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub event: Option<Value>,
    #[serde(default)]
    pub api_version: Option<Value>,
    #[serde(default)]
    pub created: Option<Value>,
    #[serde(default)]
    pub tenant_id: Option<Value>,
    #[serde(default)]
    pub request: Option<Value>,
    #[serde(default)]
    pub object: Option<Value>,
    #[serde(default)]
    pub previous_attributes: Option<Value>,
    #[serde(default)]
    pub is_update: Option<Value>,
    #[serde(default)]
    pub entity_type: Option<Value>,
    #[serde(default)]
    pub operation: Option<Value>,
}

impl InboundPayload {
    /// Names of required fields that are absent, null, or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_present(self.id.as_ref()) {
            missing.push("id");
        }
        if !matches!(&self.event, Some(Value::String(s)) if !s.is_empty()) {
            missing.push("event");
        }
        if !is_present(self.object.as_ref()) {
            missing.push("object");
        }
        missing
    }
}

/// Canonical record for one delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event identifier assigned by the platform.
    pub id: Value,

    /// Dotted `entity.operation` name.
    pub event: String,

    pub api_version: Option<Value>,

    /// When the event occurred, as sent.
    pub created: Option<Value>,

    pub tenant_id: Option<Value>,

    /// Originating request details, when the platform includes them.
    pub request: Option<Value>,

    /// The entity payload; shape depends on `entity_type`.
    pub object: Value,

    /// Prior values of changed attributes; null unless this is an update.
    pub previous_attributes: Option<Value>,

    pub is_update: bool,

    pub entity_type: Option<Value>,

    pub operation: Option<Value>,

    /// The untouched inbound body.
    #[serde(rename = "_raw")]
    pub raw: Value,
}

impl EventEnvelope {
    /// Parse and normalize a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let raw: Value = serde_json::from_slice(body)?;
        Self::from_value(raw)
    }

    /// Normalize an already-parsed body.
    pub fn from_value(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(WebhookError::Payload(
                "expected a JSON object".to_string(),
            ));
        }

        let inbound: InboundPayload = serde_json::from_value(raw.clone())?;
        let missing = inbound.missing_fields();
        if !missing.is_empty() {
            return Err(WebhookError::InvalidStructure { missing });
        }

        let Some(Value::String(event)) = inbound.event else {
            return Err(WebhookError::InvalidStructure {
                missing: vec!["event"],
            });
        };

        // Older deliveries omit the split fields; derive them from a known event.
        let known = event.parse::<EventType>().ok();
        let entity_type = inbound
            .entity_type
            .or_else(|| known.map(|e| Value::from(e.entity().as_str())));
        let operation = inbound
            .operation
            .or_else(|| known.map(|e| Value::from(e.operation().as_str())));

        Ok(Self {
            id: inbound.id.unwrap_or_default(),
            event,
            api_version: inbound.api_version,
            created: inbound.created,
            tenant_id: inbound.tenant_id,
            request: inbound.request,
            object: inbound.object.unwrap_or_default(),
            previous_attributes: inbound
                .previous_attributes
                .filter(|v| is_present(Some(v))),
            is_update: matches!(inbound.is_update, Some(Value::Bool(true))),
            entity_type,
            operation,
            raw,
        })
    }

    /// The event as a known [`EventType`], if it is one.
    pub fn event_type(&self) -> Option<EventType> {
        self.event.parse().ok()
    }

    /// Event identifier rendered without JSON quoting.
    pub fn event_id(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert to a JSON value for downstream consumers.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Falsy values (`null`, `false`, `0`, `""`) count as absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_minimal_body() {
        let body = br#"{"id":"evt_1","event":"user.created","object":{"id":42,"email":"a@b.com"},"entity_type":"user","operation":"created"}"#;
        let envelope = EventEnvelope::from_slice(body).unwrap();

        assert_eq!(envelope.id, json!("evt_1"));
        assert_eq!(envelope.event, "user.created");
        assert_eq!(envelope.object["id"], 42);
        assert!(!envelope.is_update);
        assert_eq!(envelope.previous_attributes, None);
        assert_eq!(envelope.event_type(), Some(EventType::UserCreated));
        assert_eq!(envelope.entity_type, Some(json!("user")));
    }

    #[test]
    fn test_serialized_shape() {
        let raw = json!({"id": 7, "event": "contact.updated", "object": {"id": 1}});
        let value = EventEnvelope::from_value(raw.clone()).unwrap().to_value().unwrap();

        assert_eq!(value["previous_attributes"], Value::Null);
        assert_eq!(value["is_update"], false);
        assert_eq!(value["_raw"], raw);
        assert_eq!(value["id"], 7);
        assert_eq!(value["entity_type"], "contact");
        assert_eq!(value["operation"], "updated");
    }

    #[test]
    fn test_update_fields_pass_through() {
        let raw = json!({
            "id": "evt_2",
            "event": "user.updated",
            "object": {"id": 1, "email": "new@b.com"},
            "previous_attributes": {"email": "old@b.com"},
            "is_update": true,
            "request": {"id": "req_1"},
            "tenant_id": 9,
        });
        let envelope = EventEnvelope::from_value(raw).unwrap();

        assert!(envelope.is_update);
        assert_eq!(envelope.previous_attributes, Some(json!({"email": "old@b.com"})));
        assert_eq!(envelope.request, Some(json!({"id": "req_1"})));
        assert_eq!(envelope.tenant_id, Some(json!(9)));
    }

    #[test]
    fn test_missing_object_is_rejected() {
        let body = br#"{"id":"evt_1","event":"user.created","entity_type":"user"}"#;
        let err = EventEnvelope::from_slice(body).unwrap_err();

        assert!(err.is_payload());
        assert!(matches!(err, WebhookError::InvalidStructure { ref missing } if missing == &vec!["object"]));
    }

    #[test]
    fn test_falsy_fields_count_as_missing() {
        let raw = json!({"id": "", "event": "", "object": null});
        let err = EventEnvelope::from_value(raw).unwrap_err();
        assert!(
            matches!(err, WebhookError::InvalidStructure { ref missing } if missing == &vec!["id", "event", "object"])
        );

        let raw = json!({"id": 0, "event": "user.created", "object": {}});
        assert!(EventEnvelope::from_value(raw).is_err());
    }

    #[test]
    fn test_not_json_or_not_object() {
        assert!(matches!(
            EventEnvelope::from_slice(b"not json"),
            Err(WebhookError::Payload(_))
        ));
        assert!(matches!(
            EventEnvelope::from_slice(b"[1,2,3]"),
            Err(WebhookError::Payload(_))
        ));
    }

    #[test]
    fn test_unknown_event_is_still_delivered() {
        let raw = json!({"id": "evt_3", "event": "invoice.created", "object": {"id": 1}});
        let envelope = EventEnvelope::from_value(raw).unwrap();
        assert_eq!(envelope.event_type(), None);
        assert_eq!(envelope.event_id(), "evt_3");
        assert_eq!(envelope.entity_type, None);
        assert_eq!(envelope.operation, None);
    }
}
