//! Mini Peer Cache - An embeddable distributed read-through cache
//!
//! Shards key ownership across nodes with consistent hashing, bounds each
//! node's memory with LRU eviction and collapses concurrent misses for the
//! same key into a single load.

pub mod api;
pub mod cache;
pub mod cluster;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod singleflight;
pub mod source;

pub use api::{create_router, AppState};
pub use cache::ByteView;
pub use cluster::{HttpPool, PeerGetter, PeerPicker};
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupRegistry};
