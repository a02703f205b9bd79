//! In-process event bus.
//!
//! Services publish a [`DomainEvent`] after each successful mutation.
//! Subscribers (the HTTP event stream, tests) receive them through a
//! `tokio::sync::broadcast` channel; a publish with no subscribers is
//! dropped.

use tokio::sync::broadcast;
use tracing::debug;

use sitehub_core::PhaseScope;
use sitehub_core::events::{DomainEvent, EventPayload};

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Broadcast channel of domain events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event for `scope`.
    pub fn publish(&self, scope: &PhaseScope, payload: impl Into<EventPayload>) {
        let event = DomainEvent::new(scope.clone(), payload.into());
        debug!(event = %event.name(), scope = %scope, "Publishing domain event");
        let _ = self.tx.send(event);
    }

    /// Subscribe to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
