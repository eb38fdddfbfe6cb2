//! Cache Statistics Module
//!
//! Tracks per-group counters for hits, loads, peer traffic and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of a group's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of `Group::get` calls with a non-empty key
    pub gets: u64,
    /// Number of gets answered from the local store
    pub hits: u64,
    /// Number of loads actually performed (after deduplication)
    pub loads: u64,
    /// Number of loads served by the owning peer
    pub peer_loads: u64,
    /// Number of failed peer fetches that fell back to the loader
    pub peer_errors: u64,
    /// Number of successful loader invocations
    pub local_loads: u64,
    /// Number of failed loader invocations
    pub local_load_errors: u64,
    /// Number of entries evicted from the local store
    pub evictions: u64,
    /// Current number of entries in the local store
    pub total_entries: usize,
    /// Current bytes held by the local store
    pub total_bytes: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the local hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}

// == Group Stats ==
/// Live counters shared between a group and its store's eviction callback.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    hits: AtomicU64,
    loads: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errors: AtomicU64,
    evictions: AtomicU64,
}

impl GroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load_error(&self) {
        self.local_load_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters, filling in the store's current size.
    pub fn snapshot(&self, total_entries: usize, total_bytes: u64) -> CacheStats {
        CacheStats {
            gets: self.gets.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errors: self.local_load_errors.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries,
            total_bytes,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = GroupStats::new().snapshot(0, 0);
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let live = GroupStats::new();
        live.record_get();
        live.record_hit();
        live.record_get();
        live.record_load();

        let stats = live.snapshot(1, 10);
        assert_eq!(stats.hit_rate(), 0.5);
        assert_eq!(stats.loads, 1);
    }

    #[test]
    fn test_snapshot_copies_counters() {
        let live = GroupStats::new();
        live.record_peer_load();
        live.record_peer_error();
        live.record_peer_error();
        live.record_local_load();
        live.record_local_load_error();
        live.record_eviction();

        let stats = live.snapshot(42, 4096);
        assert_eq!(stats.peer_loads, 1);
        assert_eq!(stats.peer_errors, 2);
        assert_eq!(stats.local_loads, 1);
        assert_eq!(stats.local_load_errors, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 42);
        assert_eq!(stats.total_bytes, 4096);
    }
}
