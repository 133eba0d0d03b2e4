//! Per-trigger options

use crate::{
    EventType, Result, SignatureScheme, WebhookError,
    subscription::{MAX_RETRIES_RANGE, TIMEOUT_SECONDS_RANGE, check_range},
};

pub use orgo_config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS};

/// Options a workflow chooses for its trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerOptions {
    /// Events to subscribe to, without duplicates
    pub events: Vec<EventType>,

    /// Check `x-webhook-signature` on deliveries (when a secret is configured)
    pub verify_signature: bool,

    /// Redelivery attempts the platform makes (0-10)
    pub max_retries: u8,

    /// Per-delivery timeout the platform uses (1-300 seconds)
    pub timeout_seconds: u16,

    /// Signature algorithm shared with the platform
    pub signature_scheme: SignatureScheme,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            verify_signature: true,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            signature_scheme: SignatureScheme::default(),
        }
    }
}

impl TriggerOptions {
    /// Create a builder for custom options
    pub fn builder() -> TriggerOptionsBuilder {
        TriggerOptionsBuilder::new()
    }

    /// Check the event selection and the platform's ranges
    pub fn validate(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(WebhookError::Config(
                "at least one event type is required".to_string(),
            ));
        }
        check_range("maxRetries", self.max_retries, MAX_RETRIES_RANGE)?;
        check_range("timeoutSeconds", self.timeout_seconds, TIMEOUT_SECONDS_RANGE)
    }
}

/// Builder for TriggerOptions
#[derive(Debug, Clone, Default)]
pub struct TriggerOptionsBuilder {
    options: TriggerOptions,
}

impl TriggerOptionsBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one more event
    pub fn event(mut self, event: EventType) -> Self {
        if !self.options.events.contains(&event) {
            self.options.events.push(event);
        }
        self
    }

    /// Subscribe to several events
    pub fn events(self, events: impl IntoIterator<Item = EventType>) -> Self {
        events.into_iter().fold(self, Self::event)
    }

    /// Enable or disable signature verification
    pub fn verify_signature(mut self, verify: bool) -> Self {
        self.options.verify_signature = verify;
        self
    }

    /// Set the platform's retry count
    pub fn max_retries(mut self, retries: u8) -> Self {
        self.options.max_retries = retries;
        self
    }

    /// Set the platform's delivery timeout
    pub fn timeout_seconds(mut self, seconds: u16) -> Self {
        self.options.timeout_seconds = seconds;
        self
    }

    /// Set the signature algorithm
    pub fn signature_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.options.signature_scheme = scheme;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<TriggerOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// Parse wire event names such as `user.created`.
pub fn parse_events<S: AsRef<str>>(names: &[S]) -> Result<Vec<EventType>> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TriggerOptions::default();
        assert!(options.verify_signature);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.timeout_seconds, 30);
        assert_eq!(options.signature_scheme, SignatureScheme::RollingHash);
        // No events selected yet.
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let options = TriggerOptions::builder()
            .event(EventType::UserCreated)
            .events([EventType::UserCreated, EventType::ContractUserCreated])
            .verify_signature(false)
            .max_retries(0)
            .timeout_seconds(300)
            .build()
            .unwrap();

        assert_eq!(
            options.events,
            vec![EventType::UserCreated, EventType::ContractUserCreated]
        );
        assert!(!options.verify_signature);
        assert_eq!(options.max_retries, 0);
    }

    #[test]
    fn test_builder_rejects_out_of_range() {
        let base = TriggerOptions::builder().event(EventType::ContactCreated);
        assert!(base.clone().max_retries(11).build().is_err());
        assert!(base.clone().timeout_seconds(0).build().is_err());
        assert!(base.clone().timeout_seconds(301).build().is_err());
        assert!(base.build().is_ok());
        assert!(TriggerOptions::builder().build().is_err());
    }

    #[test]
    fn test_parse_events() {
        let events = parse_events(&["user.created", "event_attend.created"]).unwrap();
        assert_eq!(events, vec![EventType::UserCreated, EventType::EventAttendCreated]);
        assert!(parse_events(&["user.exploded"]).is_err());
    }
}
