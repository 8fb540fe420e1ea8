//! In-process publish/subscribe channel for stats events.
//!
//! Producers hold an `Arc<EventBus>` and never see the registry. Delivery is
//! synchronous on the producer's thread and never reports failure back to it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tagstats_core::Datum;

/// One emitted event.
#[derive(Debug, Clone)]
pub struct StatsEvent {
    pub tag: String,
    pub datum: Datum,
}

impl StatsEvent {
    pub fn new(tag: impl Into<String>, datum: impl Into<Datum>) -> Self {
        Self {
            tag: tag.into(),
            datum: datum.into(),
        }
    }
}

/// Event consumer registered on the bus.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &StatsEvent);
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct EventBus {
    handlers: DashMap<SubscriptionId, Arc<dyn EventHandler>>,
    seq: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&self, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.seq.fetch_add(1, Ordering::Relaxed));
        self.handlers.insert(id, handler);
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&self, event: &StatsEvent) {
        // Snapshot first so handlers may (un)subscribe without holding a shard lock.
        let handlers: Vec<Arc<dyn EventHandler>> =
            self.handlers.iter().map(|e| Arc::clone(e.value())).collect();
        for h in handlers {
            h.on_event(event);
        }
    }

    /// Fire-and-forget producer entry point.
    pub fn emit(&self, tag: impl Into<String>, datum: impl Into<Datum>) {
        self.publish(&StatsEvent::new(tag, datum));
    }
}
