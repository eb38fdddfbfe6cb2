//! Cache Module
//!
//! Provides the per-group local store: immutable values, byte-bounded LRU
//! eviction and statistics.

mod byteview;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use lru::{ByteSize, LruStore, OnEvicted};
pub use stats::{CacheStats, GroupStats};
pub use store::MainCache;
