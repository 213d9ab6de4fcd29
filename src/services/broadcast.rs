//! Fan-out of accepted webhooks to live dashboard subscribers.
//!
//! Delivery is fire-and-forget on a `tokio::sync::broadcast` channel: a
//! slow or disconnected subscriber never blocks or fails webhook
//! processing. The live-transport layer registers subscribers through
//! [`EventBroadcaster::subscribe`].

use crate::consts;
use serde::Serialize;
use tokio::sync::broadcast;

/// Message delivered to every connected subscriber.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BroadcastMessage {
    pub channel: String,
    pub payload: serde_json::Value,
}

#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<BroadcastMessage>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);

        Self { tx }
    }

    /// Registers a live subscriber; one receiver per open dashboard view.
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.tx.subscribe()
    }

    /// Publishes `payload` on `channel` to all current subscribers.
    ///
    /// Best effort: sending with zero subscribers is not an error, and a
    /// lagging receiver drops its oldest buffered messages rather than
    /// applying backpressure here.
    pub fn broadcast(&self, channel: &str, payload: serde_json::Value) {
        let _ = self.tx.send(BroadcastMessage {
            channel: channel.to_string(),
            payload,
        });
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(consts::BROADCAST_CAPACITY)
    }
}
