//! Live collector settings: the activation gate and the ring capacity.
//!
//! Both values are atomics so an operator can flip them while producers are
//! running. The gate is re-read per event; the capacity is read once per tag
//! creation and therefore only affects tags created afterwards.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::StatsSection;

#[derive(Debug)]
pub struct StatsSettings {
    active: AtomicBool,
    ring_size: AtomicUsize,
}

impl StatsSettings {
    pub fn new(active: bool, ring_size: usize) -> Self {
        Self {
            active: AtomicBool::new(active),
            ring_size: AtomicUsize::new(ring_size),
        }
    }

    pub fn from_config(cfg: &StatsSection) -> Self {
        Self::new(cfg.active, cfg.ring_size)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, on: bool) {
        self.active.store(on, Ordering::Release);
    }

    pub fn ring_size(&self) -> usize {
        self.ring_size.load(Ordering::Acquire)
    }

    /// Not validated here: a zero capacity is reported when the next tag is created.
    pub fn set_ring_size(&self, n: usize) {
        self.ring_size.store(n, Ordering::Release);
    }
}
