//! Fixed-capacity insertion-ordered map with FIFO eviction.
//!
//! `BoundedMap` serializes its own mutations behind a mutex, so callers share it
//! by reference without extra locking. Iteration order is insertion order; once
//! the map is full, each new key evicts exactly one oldest entry.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, StatsError};

struct Inner<K, V> {
    order: VecDeque<K>,
    map: HashMap<K, V>,
}

pub struct BoundedMap<K, V> {
    capacity: NonZeroUsize,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                order: VecDeque::with_capacity(capacity.get()),
                map: HashMap::with_capacity(capacity.get()),
            }),
        }
    }

    /// Validating constructor for raw configuration values.
    pub fn try_new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(StatsError::InvalidCapacity(capacity))?;
        Ok(Self::new(capacity))
    }

    // Poisoned lock means a panic elsewhere mid-mutation; the structure itself
    // is still consistent after every statement, so keep serving.
    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("bounded map lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Insert or replace. Returns the evicted oldest pair when the insert
    /// pushed the map past capacity.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let mut g = self.lock();
        if let Some(slot) = g.map.get_mut(&key) {
            *slot = value;
            return None;
        }

        g.order.push_back(key.clone());
        g.map.insert(key, value);

        if g.order.len() > self.capacity.get() {
            let oldest = g.order.pop_front()?;
            let v = g.map.remove(&oldest)?;
            return Some((oldest, v));
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().map.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn clear(&self) {
        let mut g = self.lock();
        g.order.clear();
        g.map.clear();
    }

    /// Earliest-inserted key still retained.
    pub fn oldest(&self) -> Option<K> {
        self.lock().order.front().cloned()
    }

    /// Size and oldest key, read under a single lock.
    pub fn window(&self) -> Option<(usize, K)> {
        let g = self.lock();
        g.order.front().map(|k| (g.order.len(), k.clone()))
    }

    /// Copy of all entries in insertion order.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let g = self.lock();
        g.order
            .iter()
            .filter_map(|k| g.map.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }
}
