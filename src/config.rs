//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cluster::{PoolOptions, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL other nodes use to reach this one
    pub self_url: String,
    /// Base URLs of all nodes in the cluster (always includes `self_url`)
    pub peers: Vec<String>,
    /// Path prefix of the peer endpoint
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Byte budget of the group's local store, 0 = unbounded
    pub cache_bytes: u64,
    /// Name of the group this node serves
    pub group_name: String,
    /// Directory the file loader reads values from
    pub source_dir: PathBuf,
    /// Peer request timeout in milliseconds, 0 = no timeout
    pub peer_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_URL` - This node's base URL (default: `http://localhost:<port>`)
    /// - `PEERS` - Comma-separated peer base URLs (default: none)
    /// - `BASE_PATH` - Peer endpoint prefix (default: `/_peercache/`)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `CACHE_BYTES` - Local store budget in bytes (default: 64 MiB)
    /// - `GROUP_NAME` - Served group (default: `files`)
    /// - `SOURCE_DIR` - Loader directory (default: `./data`)
    /// - `PEER_TIMEOUT_MS` - Peer request timeout (default: 2000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config reading each variable through `var`.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server_port = parse_var(&var, "SERVER_PORT").unwrap_or(defaults.server_port);
        let self_url = var("SELF_URL")
            .map(|v| normalize_url(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));
        let peers = var("PEERS").map(|v| parse_peers(&v)).unwrap_or_default();

        Self {
            server_port,
            peers: with_self(peers, &self_url),
            self_url,
            base_path: normalize_base_path(&var("BASE_PATH").unwrap_or(defaults.base_path)),
            replicas: parse_var::<usize>(&var, "REPLICAS")
                .filter(|&r| r > 0)
                .unwrap_or(defaults.replicas),
            cache_bytes: parse_var(&var, "CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            group_name: var("GROUP_NAME").unwrap_or(defaults.group_name),
            source_dir: var("SOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_dir),
            peer_timeout_ms: parse_var(&var, "PEER_TIMEOUT_MS").unwrap_or(defaults.peer_timeout_ms),
        }
    }

    /// Options for this node's peer pool.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            base_path: self.base_path.clone(),
            replicas: self.replicas,
            timeout: (self.peer_timeout_ms > 0)
                .then(|| Duration::from_millis(self.peer_timeout_ms)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_url = "http://localhost:8001".to_string();
        Self {
            server_port: 8001,
            peers: vec![self_url.clone()],
            self_url,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            cache_bytes: 64 * 1024 * 1024,
            group_name: "files".to_string(),
            source_dir: PathBuf::from("./data"),
            peer_timeout_ms: 2000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.trim().parse().ok())
}

/// Node ids are compared as strings, so every URL is spelled the same way.
fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Splits a comma-separated list, dropping blanks and trailing slashes.
fn parse_peers(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_url)
        .filter(|p| !p.is_empty())
        .collect()
}

fn with_self(mut peers: Vec<String>, self_url: &str) -> Vec<String> {
    if !peers.iter().any(|p| p == self_url) {
        peers.push(self_url.to_string());
    }
    peers
}

/// Ensures a single leading and trailing `/`.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
