//! Cache Store Module
//!
//! Lock-guarded LRU store owned by a single group.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{ByteView, GroupStats, LruStore, OnEvicted};

// == Main Cache ==
/// A group's local store of values it owns.
///
/// Every get and add runs under one mutex, so recency updates and the byte
/// budget are never observed half-applied.
#[derive(Debug)]
pub struct MainCache {
    lru: Mutex<LruStore<ByteView>>,
}

impl MainCache {
    // == Constructor ==
    /// Creates a store bounded to `cache_bytes` (0 = unbounded).
    ///
    /// Evictions are counted on `stats`.
    pub fn new(cache_bytes: u64, stats: Arc<GroupStats>) -> Self {
        let on_evicted: OnEvicted<ByteView> =
            Box::new(move |_key: &str, _value: ByteView| stats.record_eviction());
        Self {
            lru: Mutex::new(LruStore::new(cache_bytes, Some(on_evicted))),
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.lock().get(key).cloned()
    }

    // == Add ==
    pub fn add(&self, key: &str, value: ByteView) {
        self.lock().add(key.to_string(), value);
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the bytes currently held.
    pub fn bytes(&self) -> u64 {
        self.lock().bytes()
    }

    fn lock(&self) -> MutexGuard<'_, LruStore<ByteView>> {
        // The store is left consistent between statements, a panic elsewhere
        // while holding the guard does not corrupt it.
        self.lru.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
