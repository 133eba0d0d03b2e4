//! Webhook receiver for handling incoming deliveries

use crate::{EventEnvelope, Result, SIGNATURE_HEADER, SignatureScheme, WebhookSignature};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Verifies and normalizes inbound deliveries.
///
/// Immutable once built; share it behind an `Arc` across concurrent requests.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    verify_signature: bool,
    signature: Option<WebhookSignature>,
}

impl WebhookReceiver {
    /// Create a receiver. An empty secret is treated as no secret.
    pub fn new(verify_signature: bool, secret: Option<String>) -> Self {
        Self {
            verify_signature,
            signature: secret
                .filter(|s| !s.is_empty())
                .map(WebhookSignature::new),
        }
    }

    /// Select the signature algorithm
    pub fn with_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.signature = self.signature.map(|s| s.with_scheme(scheme));
        self
    }

    /// Whether deliveries are actually checked: enabled and a secret is set.
    pub fn verifies(&self) -> bool {
        self.verify_signature && self.signature.is_some()
    }

    /// Handle a delivery with headers from a plain map (names matched case-insensitively).
    pub fn handle(&self, body: &[u8], headers: &HashMap<String, String>) -> Result<EventEnvelope> {
        self.process(body, find_header(headers, SIGNATURE_HEADER))
    }

    /// Handle a delivery with headers from an HTTP request.
    pub fn handle_http(&self, body: &[u8], headers: &http::HeaderMap) -> Result<EventEnvelope> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        self.process(body, signature)
    }

    fn process(&self, body: &[u8], signature: Option<&str>) -> Result<EventEnvelope> {
        // Verify over the raw bytes before anything is parsed.
        if self.verify_signature
            && let Some(signer) = &self.signature
        {
            let payload = String::from_utf8_lossy(body);
            if let Err(e) = signer.verify(&payload, signature) {
                warn!(error = %e, "Rejected webhook delivery");
                return Err(e);
            }
        }

        let envelope = EventEnvelope::from_slice(body).inspect_err(|e| {
            warn!(error = %e, "Malformed webhook delivery");
        })?;

        debug!(
            event_id = %envelope.event_id(),
            event = %envelope.event,
            "Accepted webhook delivery"
        );
        Ok(envelope)
    }
}

/// Look up a header by name, ignoring ASCII case.
pub fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebhookError;

    const BODY: &[u8] =
        br#"{"id":"evt_1","event":"user.created","object":{"id":42,"email":"a@b.com"},"entity_type":"user","operation":"created"}"#;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sign(body: &[u8], secret: &str) -> String {
        WebhookSignature::new(secret).sign(std::str::from_utf8(body).unwrap())
    }

    #[test]
    fn test_verification_disabled() {
        let receiver = WebhookReceiver::new(false, Some("secret".into()));
        assert!(!receiver.verifies());

        let envelope = receiver.handle(BODY, &HashMap::new()).unwrap();
        assert_eq!(envelope.object["id"], 42);
        assert!(!envelope.is_update);
    }

    #[test]
    fn test_no_secret_skips_verification() {
        for secret in [None, Some(String::new())] {
            let receiver = WebhookReceiver::new(true, secret);
            assert!(!receiver.verifies());
            assert!(receiver.handle(BODY, &HashMap::new()).is_ok());
        }
    }

    #[test]
    fn test_valid_signature() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()));
        let signature = sign(BODY, "secret");

        let envelope = receiver
            .handle(BODY, &headers(&[("X-Webhook-Signature", &signature)]))
            .unwrap();
        assert_eq!(envelope.event, "user.created");
    }

    #[test]
    fn test_missing_signature() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()));

        let err = receiver.handle(BODY, &HashMap::new()).unwrap_err();
        assert!(matches!(err, WebhookError::SignatureMissing));

        let err = receiver
            .handle(BODY, &headers(&[("x-webhook-signature", "")]))
            .unwrap_err();
        assert!(matches!(err, WebhookError::SignatureMissing));
    }

    #[test]
    fn test_wrong_signature() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()));
        let signature = sign(BODY, "other");

        let err = receiver
            .handle(BODY, &headers(&[("x-webhook-signature", &signature)]))
            .unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_signature_checked_before_parsing() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()));
        let err = receiver.handle(b"not json", &HashMap::new()).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_payload_errors() {
        let receiver = WebhookReceiver::new(false, None);

        let err = receiver.handle(b"{not json", &HashMap::new()).unwrap_err();
        assert!(matches!(err, WebhookError::Payload(_)));

        let err = receiver
            .handle(br#"{"id":"evt_1","event":"user.created"}"#, &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, WebhookError::InvalidStructure { .. }));
    }

    #[test]
    fn test_handle_http_header_map() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()));
        let mut map = http::HeaderMap::new();
        map.insert(SIGNATURE_HEADER, sign(BODY, "secret").parse().unwrap());

        assert!(receiver.handle_http(BODY, &map).is_ok());
    }

    #[test]
    fn test_hmac_scheme() {
        let receiver = WebhookReceiver::new(true, Some("secret".into()))
            .with_scheme(SignatureScheme::HmacSha256);
        let signature = WebhookSignature::new("secret")
            .with_scheme(SignatureScheme::HmacSha256)
            .sign(std::str::from_utf8(BODY).unwrap());

        assert!(
            receiver
                .handle(BODY, &headers(&[("x-webhook-signature", &signature)]))
                .is_ok()
        );
        // The rolling-hash signature no longer matches.
        assert!(
            receiver
                .handle(BODY, &headers(&[("x-webhook-signature", &sign(BODY, "secret"))]))
                .is_err()
        );
    }

    #[test]
    fn test_find_header_case_insensitive() {
        let map = headers(&[("X-WEBHOOK-SIGNATURE", "abc")]);
        assert_eq!(find_header(&map, "x-webhook-signature"), Some("abc"));
        assert_eq!(find_header(&map, "x-other"), None);
    }
}
