//! Downstream hand-off for normalized events

use crate::{EventEnvelope, Result, WebhookError};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Receives exactly one envelope per accepted delivery.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, envelope: EventEnvelope) -> Result<()>;
}

/// Forwards envelopes into a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<EventEnvelope>,
}

impl ChannelSink {
    /// Create a sink and the receiving half of its channel
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<EventEnvelope>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, envelope: EventEnvelope) -> Result<()> {
        self.tx
            .send(envelope)
            .await
            .map_err(|_| WebhookError::SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope() -> EventEnvelope {
        EventEnvelope::from_value(json!({"id": "evt_1", "event": "user.created", "object": {"id": 1}}))
            .unwrap()
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.emit(envelope()).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "user.created");
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);

        assert!(matches!(sink.emit(envelope()).await, Err(WebhookError::SinkClosed)));
    }
}
