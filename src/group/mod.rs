//! Group Module
//!
//! A group is one cache namespace: a loader for the source of truth, a
//! local store for the keys this node owns, and an optional peer picker to
//! route everything else to its owner.
//!
//! # Lookup order
//! 1. Local store
//! 2. Owning peer (if peers are registered and the owner is another node)
//! 3. Loader, whose result is stored locally
//!
//! Concurrent misses for the same key share a single execution of steps 2-3.

mod registry;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, GroupStats, MainCache};
use crate::cluster::{PeerGetter, PeerPicker};
use crate::error::{CacheError, Result};
use crate::models::wire::Request;
use crate::singleflight::SingleFlight;

pub use registry::GroupRegistry;

// == Getter ==
/// Loads a value from the source of truth on a cache miss.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a plain closure into a [`Getter`].
///
/// # Example
/// ```ignore
/// let getter = GetterFn::new(|key| Ok(key.as_bytes().to_vec()));
/// ```
pub struct GetterFn<F>(F);

impl<F> GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

// == Group ==
/// A named, read-through cache namespace.
pub struct Group {
    name: String,
    getter: Box<dyn Getter>,
    main_cache: MainCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: SingleFlight<ByteView>,
    stats: Arc<GroupStats>,
}

impl Group {
    // == Constructor ==
    /// Creates a standalone group. Use [`GroupRegistry::new_group`] to make
    /// it reachable by name from peers.
    ///
    /// # Arguments
    /// * `name` - Namespace name
    /// * `cache_bytes` - Byte budget of the local store, 0 for no limit
    /// * `getter` - Loader invoked on misses this node must resolve itself
    pub fn new(name: impl Into<String>, cache_bytes: u64, getter: impl Getter + 'static) -> Self {
        let stats = Arc::new(GroupStats::new());
        Self {
            name: name.into(),
            getter: Box::new(getter),
            main_cache: MainCache::new(cache_bytes, Arc::clone(&stats)),
            peers: OnceLock::new(),
            loader: SingleFlight::new(),
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker used to route keys to their owner.
    ///
    /// # Panics
    /// If peers were already registered for this group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    pub async fn get(self: &Arc<Self>, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key is required".to_string()));
        }

        self.stats.record_get();
        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_hit();
            return Ok(value);
        }

        self.load(key).await
    }

    // == Stats ==
    /// Returns a snapshot of this group's counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.main_cache.len(), self.main_cache.bytes())
    }

    /// Number of entries in the local store.
    pub fn cache_len(&self) -> usize {
        self.main_cache.len()
    }

    async fn load(self: &Arc<Self>, key: &str) -> Result<ByteView> {
        let group = Arc::clone(self);
        let owned_key = key.to_string();
        self.loader
            .work(key, move || async move { group.load_once(&owned_key).await })
            .await
    }

    /// Resolves one miss: owning peer first, loader as fallback.
    async fn load_once(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();

        if let Some(peer) = self.peers.get().and_then(|peers| peers.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    self.stats.record_peer_load();
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(group = %self.name, key, error = %err, "failed to get from peer");
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.getter.get(key).await.map_err(|err| {
            self.stats.record_local_load_error();
            CacheError::Source(format!("{:#}", err))
        })?;
        self.stats.record_local_load();

        let value = ByteView::from(bytes);
        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    /// Values owned by another node are not stored here; only the owner
    /// keeps them.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let req = Request::new(self.name.as_str(), key);
        let res = peer.get(&req).await?;
        Ok(ByteView::from(res.value))
    }
}
