//! Cluster Module
//!
//! Key ownership across nodes and the capabilities a group uses to reach
//! the owning peer.
//!
//! # Components
//! - `HashRing` - consistent hashing of keys onto node ids
//! - `HttpPool` - peer directory resolving owners to HTTP clients
//! - `HttpGetter` - client side of the peer fetch RPC

mod client;
mod pool;
mod ring;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::wire::{Request, Response};

pub use client::HttpGetter;
pub use pool::{HttpPool, PoolOptions, DEFAULT_BASE_PATH};
pub use ring::{HashFn, HashRing, DEFAULT_REPLICAS};

// == Peer Picker ==
/// Resolves which peer owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or None when the key should be resolved
    /// locally (no peers known, or this node owns it).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value from a remote group.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, req: &Request) -> Result<Response>;
}
