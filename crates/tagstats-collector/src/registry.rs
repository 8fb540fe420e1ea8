//! Process-scoped tag registry.
//!
//! `StatsRegistry` is a cheap cloneable handle created once at startup and
//! passed to whoever reports. Producers reach it only through the [`EventBus`]
//! it subscribes to in [`StatsRegistry::init`].

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use tagstats_core::error::{Result, StatsError};
use tagstats_core::{sort_records, Clock, Data, Datum, Detail, Entry, Record, SystemClock};

use crate::bus::{EventBus, EventHandler, StatsEvent, SubscriptionId};
use crate::settings::StatsSettings;

#[derive(Clone)]
pub struct StatsRegistry {
    inner: Arc<RegistryInner>,
    bus: Arc<EventBus>,
    subscription: Arc<Mutex<Option<SubscriptionId>>>,
}

struct RegistryInner {
    buffers: DashMap<String, Arc<Data>>,
    settings: Arc<StatsSettings>,
    clock: Arc<dyn Clock>,
    restart_time_ms: AtomicI64,
}

impl StatsRegistry {
    pub fn new(settings: Arc<StatsSettings>, bus: Arc<EventBus>) -> Self {
        Self::with_clock(settings, bus, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: Arc<StatsSettings>, bus: Arc<EventBus>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_ms();
        Self {
            inner: Arc::new(RegistryInner {
                buffers: DashMap::new(),
                settings,
                clock,
                restart_time_ms: AtomicI64::new(now),
            }),
            bus,
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Subscribe to the bus. Calling it twice without `stop()` is a no-op.
    pub fn init(&self) {
        let mut sub = lock_subscription(&self.subscription);
        if sub.is_some() {
            tracing::warn!("stats registry already initialised; ignoring init");
            return;
        }
        let handler: Arc<dyn EventHandler> = self.inner.clone();
        *sub = Some(self.bus.subscribe(handler));
        self.inner
            .restart_time_ms
            .store(self.inner.clock.now_ms(), Ordering::Release);
        tracing::info!(
            active = self.inner.settings.is_active(),
            ring_size = self.inner.settings.ring_size(),
            "stats collection initialised"
        );
    }

    /// Unsubscribe and drop every tag with its history.
    pub fn stop(&self) {
        if let Some(id) = lock_subscription(&self.subscription).take() {
            self.bus.unsubscribe(id);
        }
        for e in self.inner.buffers.iter() {
            e.value().clear();
        }
        let tags = self.inner.buffers.len();
        self.inner.buffers.clear();
        tracing::info!(tags, "stats collection stopped");
    }

    pub fn is_subscribed(&self) -> bool {
        lock_subscription(&self.subscription).is_some()
    }

    /// Existing data for `tag`, or a new empty one registered atomically.
    pub fn stats_for(&self, tag: &str) -> Result<Arc<Data>> {
        self.inner.stats_for(tag)
    }

    /// Record directly, bypassing the bus. Still honours the gate.
    pub fn on_event(&self, tag: &str, datum: Datum) {
        self.inner.record(tag, datum);
    }

    /// One record per tag, sorted by tag.
    pub fn records(&self) -> Vec<Record> {
        let now = self.inner.clock.now_ms();
        let mut out: Vec<Record> = self
            .inner
            .buffers
            .iter()
            .map(|e| {
                let data = e.value();
                Record::new(e.key().as_str(), data.rate_at(now), data.count())
            })
            .collect();
        sort_records(&mut out);
        out
    }

    /// Raw retained entries for drill-down. Unknown tags yield an empty list
    /// and are not created. Callers must check [`Record::detail_forbidden`]
    /// before showing these; [`StatsRegistry::detail`] does that for them.
    pub fn values(&self, tag: &str) -> Vec<Entry> {
        self.inner
            .buffers
            .get(tag)
            .map(|d| d.value().values())
            .unwrap_or_default()
    }

    /// Aggregate record plus values, redacted for deny-listed tags.
    pub fn detail(&self, tag: &str) -> Option<Detail> {
        let data = self.inner.buffers.get(tag).map(|d| Arc::clone(d.value()))?;
        let record = Record::new(tag, data.rate(), data.count());
        Some(Detail::new(record, data.values()))
    }

    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.inner.buffers.iter().map(|e| e.key().clone()).collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.inner.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.buffers.is_empty()
    }

    /// When collection was last (re)started, in epoch milliseconds.
    pub fn restart_time_ms(&self) -> i64 {
        self.inner.restart_time_ms.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.inner.settings
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }
}

impl RegistryInner {
    fn stats_for(&self, tag: &str) -> Result<Arc<Data>> {
        if let Some(d) = self.buffers.get(tag) {
            return Ok(Arc::clone(d.value()));
        }

        let ring_size = self.settings.ring_size();
        let capacity = NonZeroUsize::new(ring_size).ok_or(StatsError::InvalidCapacity(ring_size))?;

        // The entry guard holds the shard lock, so exactly one Data wins a race.
        let entry = self.buffers.entry(tag.to_string()).or_insert_with(|| {
            tracing::debug!(tag = %tag, capacity = ring_size, "stats tag created");
            Arc::new(Data::new(capacity, Arc::clone(&self.clock)))
        });
        Ok(Arc::clone(entry.value()))
    }

    fn record(&self, tag: &str, datum: Datum) {
        if !self.settings.is_active() {
            return;
        }
        match self.stats_for(tag) {
            Ok(data) => data.record(datum),
            Err(e) => {
                tracing::error!(tag = %tag, code = e.code().as_str(), error = %e, "stats event dropped");
            }
        }
    }
}

impl EventHandler for RegistryInner {
    fn on_event(&self, event: &StatsEvent) {
        self.record(&event.tag, event.datum.clone());
    }
}

// Poisoned lock only guards an Option; take the inner value rather than panic.
fn lock_subscription(m: &Mutex<Option<SubscriptionId>>) -> std::sync::MutexGuard<'_, Option<SubscriptionId>> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
