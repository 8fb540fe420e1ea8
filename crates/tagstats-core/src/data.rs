//! Per-tag ring buffer.
//!
//! A `Data` keeps the most recent events of one tag in a [`BoundedMap`] keyed
//! by [`Stamp`], plus a lifetime counter that eviction never touches.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::bounded::BoundedMap;
use crate::clock::Clock;
use crate::format::display_form;

/// Opaque event payload. `Value::Null` is the null datum.
pub type Datum = serde_json::Value;

/// Event time plus a per-tag sequence number.
///
/// Two events in the same millisecond get distinct stamps, so neither
/// overwrites the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Stamp {
    pub at_ms: i64,
    pub seq: u64,
}

/// One retained event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub stamp: Stamp,
    pub datum: Datum,
}

pub struct Data {
    count: AtomicU64,
    seq: AtomicU64,
    buffer: BoundedMap<Stamp, Datum>,
    clock: Arc<dyn Clock>,
}

impl Data {
    pub fn new(capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            count: AtomicU64::new(0),
            seq: AtomicU64::new(0),
            buffer: BoundedMap::new(capacity),
            clock,
        }
    }

    /// Record one event at the current time.
    pub fn record(&self, datum: Datum) {
        let stamp = Stamp {
            at_ms: self.clock.now_ms(),
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };
        // Count first: readers must never see more retained entries than events.
        self.count.fetch_add(1, Ordering::AcqRel);
        self.buffer.put(stamp, display_form(datum));
    }

    /// Retained events, oldest first.
    pub fn values(&self) -> Vec<Entry> {
        self.buffer
            .snapshot()
            .into_iter()
            .map(|(stamp, datum)| Entry { stamp, datum })
            .collect()
    }

    /// Lifetime event count.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn retained(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Events per minute over the retained window.
    pub fn rate(&self) -> f64 {
        self.rate_at(self.clock.now_ms())
    }

    /// Rate as seen at `now_ms`; lets a report use one instant for every tag.
    pub fn rate_at(&self, now_ms: i64) -> f64 {
        match self.buffer.window() {
            Some((len, oldest)) => rate_per_minute(len, oldest.at_ms, now_ms),
            None => 0.0,
        }
    }

    /// Drop retained events. The lifetime count is kept.
    pub fn clear(&self) {
        self.buffer.clear();
    }
}

/// `retained / (now - oldest) * 60_000`, or 0 for an empty buffer or a
/// non-positive window.
pub fn rate_per_minute(retained: usize, oldest_ms: i64, now_ms: i64) -> f64 {
    let elapsed = now_ms.saturating_sub(oldest_ms);
    if retained == 0 || elapsed <= 0 {
        return 0.0;
    }
    retained as f64 / elapsed as f64 * 60_000.0
}
