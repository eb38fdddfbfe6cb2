//! HTTP peer pool
//!
//! Peer directory: tracks the known nodes, places them on a hash ring and
//! hands out a client for whichever node owns a key.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::{HashRing, HttpGetter, PeerGetter, PeerPicker, DEFAULT_REPLICAS};
use crate::error::{CacheError, Result};

/// Path prefix under which nodes serve each other.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";

// == Pool Options ==
/// Tunables for an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Path prefix for peer requests, with leading and trailing `/`
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Per-request timeout for peer fetches, None = wait indefinitely
    pub timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            timeout: None,
        }
    }
}

/// Ring plus clients, swapped as one unit on membership change.
#[derive(Debug)]
struct PeerTable {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer directory backed by a consistent hash ring.
///
/// [`HttpPool::set_peers`] builds a fresh table and swaps it in under the
/// write lock, so concurrent [`PeerPicker::pick_peer`] calls see either the
/// old or the new membership.
#[derive(Debug)]
pub struct HttpPool {
    /// This node's base URL, e.g. `http://10.0.0.1:8001`
    self_url: String,
    options: PoolOptions,
    client: Client,
    table: RwLock<Arc<PeerTable>>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_url`, with no peers.
    pub fn new(self_url: impl Into<String>, options: PoolOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CacheError::Internal(format!("building peer client: {}", e)))?;

        let table = PeerTable {
            ring: HashRing::new(options.replicas),
            getters: HashMap::new(),
        };

        Ok(Self {
            self_url: self_url.into(),
            options,
            client,
            table: RwLock::new(Arc::new(table)),
        })
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    // == Set Peers ==
    /// Replaces the full peer set. Not additive.
    ///
    /// Each peer is a base URL like `http://10.0.0.2:8001`; include this
    /// node's own URL so it takes its share of the keys.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(self.options.replicas);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let base_url = format!("{}{}", peer, self.options.base_path);
                (
                    peer.clone(),
                    Arc::new(HttpGetter::new(base_url, self.client.clone())),
                )
            })
            .collect();

        let table = Arc::new(PeerTable { ring, getters });
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;

        info!(node = %self.self_url, peers = peers.len(), "peer set updated");
    }

    /// Returns the node id owning `key`, including this node.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.snapshot().ring.get(key).map(str::to_string)
    }

    /// Returns the current peer ids in sorted order.
    pub fn peers(&self) -> Vec<String> {
        self.snapshot().ring.nodes().map(str::to_string).collect()
    }

    fn snapshot(&self) -> Arc<PeerTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let table = self.snapshot();
        let peer = table.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        debug!(node = %self.self_url, peer, key, "pick peer");
        let getter: Arc<dyn PeerGetter> = table.getters.get(peer)?.clone();
        Some(getter)
    }
}
