//! Error types for webhook ingress and subscription lifecycle

use orgo_http_client::HttpClientError;
use thiserror::Error;

/// Errors that can occur during webhook operations
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Signature verification is enabled but the request carried none
    #[error("Webhook signature missing")]
    SignatureMissing,

    /// The supplied signature does not match the payload
    #[error("Invalid webhook signature")]
    SignatureInvalid,

    /// Body is not valid JSON or not a JSON object
    #[error("Payload error: {0}")]
    Payload(String),

    /// Required envelope fields are absent
    #[error("Invalid payload structure: missing {}", .missing.join(", "))]
    InvalidStructure { missing: Vec<&'static str> },

    /// The Orgo API rejected a lifecycle call
    #[error("Failed to {action} Orgo webhook: {message}")]
    Upstream {
        action: &'static str,
        message: String,
    },

    /// Invalid trigger options
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static data could not be read or persisted
    #[error("Static data error: {0}")]
    Store(String),

    /// The downstream receiver is gone
    #[error("Event sink closed")]
    SinkClosed,

    /// Administration API call failed
    #[error(transparent)]
    Http(#[from] HttpClientError),
}

impl WebhookError {
    /// Signature missing or invalid.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::SignatureMissing | Self::SignatureInvalid)
    }

    /// Body unparseable or structurally invalid.
    pub fn is_payload(&self) -> bool {
        matches!(self, Self::Payload(_) | Self::InvalidStructure { .. })
    }

    /// The remote platform failed the request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Http(_))
    }

    /// HTTP status the ingress endpoint answers with for this error.
    pub fn status_code(&self) -> u16 {
        if self.is_authentication() {
            401
        } else if self.is_payload() {
            400
        } else if self.is_upstream() {
            502
        } else {
            500
        }
    }

    pub(crate) fn upstream(action: &'static str, err: HttpClientError) -> Self {
        Self::Upstream {
            action,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::Payload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(WebhookError::SignatureMissing.is_authentication());
        assert!(WebhookError::SignatureInvalid.is_authentication());
        assert!(WebhookError::Payload("bad".into()).is_payload());
        assert!(
            WebhookError::InvalidStructure {
                missing: vec!["object"]
            }
            .is_payload()
        );
        assert!(!WebhookError::SinkClosed.is_payload());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WebhookError::SignatureInvalid.status_code(), 401);
        assert_eq!(WebhookError::Payload("x".into()).status_code(), 400);
        assert_eq!(
            WebhookError::Upstream {
                action: "create",
                message: "boom".into()
            }
            .status_code(),
            502
        );
        assert_eq!(WebhookError::SinkClosed.status_code(), 500);
    }

    #[test]
    fn test_messages() {
        let err = WebhookError::InvalidStructure {
            missing: vec!["id", "object"],
        };
        assert_eq!(err.to_string(), "Invalid payload structure: missing id, object");

        let err = WebhookError::upstream(
            "create",
            HttpClientError::Response {
                status: 422,
                message: "eventTypes is required".into(),
            },
        );
        assert!(err.to_string().starts_with("Failed to create Orgo webhook"));
        assert!(err.to_string().contains("eventTypes is required"));
    }
}
