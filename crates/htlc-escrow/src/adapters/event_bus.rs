//! Event Bus Adapter
//!
//! In-memory `EscrowEventPublisher` on top of `tokio::sync::broadcast`.

use crate::config::EscrowConfig;
use crate::events::EscrowEvent;
use crate::ports::outbound::EscrowEventPublisher;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Default channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Broadcast publisher. Every subscriber sees every event published after it subscribed.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<EscrowEvent>,
    events_published: AtomicU64,
}

impl BroadcastEventPublisher {
    /// Create with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Create with the capacity from `config.event_channel_capacity`.
    pub fn from_config(config: &EscrowConfig) -> Self {
        Self::new(config.event_channel_capacity)
    }

    /// Subscribe to subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<EscrowEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published, including those nobody received.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EscrowEventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: EscrowEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = kind, receivers, "Escrow event published");
                receivers
            }
            // No receivers
            Err(_) => {
                debug!(event = kind, "Escrow event published with no subscribers");
                0
            }
        }
    }
}
