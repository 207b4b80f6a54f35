//! Broadcast bus for [`DuelEvent`]s.

use tokio::sync::broadcast;

use super::DuelEvent;

/// Cloneable handle over a broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DuelEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the given buffer per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: DuelEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "duel::events", "no subscribers for duel event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DuelEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
