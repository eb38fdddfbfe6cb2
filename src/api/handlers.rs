//! API Handlers
//!
//! HTTP request handlers for the peer endpoint and the client-facing API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Uri},
    response::IntoResponse,
    Json,
};
use prost::Message;
use tracing::debug;

use crate::cluster::DEFAULT_BASE_PATH;
use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{GetResponse, GroupStatsResponse, HealthResponse, Response};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<GroupRegistry>,
    /// Prefix of the peer endpoint, with leading and trailing `/`
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState serving peers under `base_path`.
    pub fn new(registry: Arc<GroupRegistry>, base_path: impl Into<String>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
        }
    }

    /// Creates a new AppState with the default peer base path.
    pub fn with_default_base_path(registry: Arc<GroupRegistry>) -> Self {
        Self::new(registry, DEFAULT_BASE_PATH)
    }

    fn group(&self, name: &str) -> Result<Arc<Group>> {
        self.registry
            .get_group(name)
            .ok_or_else(|| CacheError::NotFound(format!("no such group: {}", name)))
    }
}

/// Handler for GET {base_path}{group}/{key}
///
/// Serves a value to another node as a protobuf `Response`.
pub async fn peer_handler(State(state): State<AppState>, uri: Uri) -> Result<impl IntoResponse> {
    let rest = uri
        .path()
        .strip_prefix(state.base_path.as_str())
        .ok_or_else(|| CacheError::InvalidArgument(format!("unexpected path: {}", uri.path())))?;
    let (group_name, key) = parse_peer_path(rest)?;
    debug!(group = %group_name, key = %key, "peer request");

    let group = state.group(&group_name)?;
    let view = group.get(&key).await?;

    let body = Response {
        value: view.byte_slice(),
    }
    .encode_to_vec();

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], body))
}

/// Splits `<group>/<key>` and percent-decodes both parts.
fn parse_peer_path(rest: &str) -> Result<(String, String)> {
    let (group, key) = rest
        .split_once('/')
        .ok_or_else(|| CacheError::InvalidArgument("bad request".to_string()))?;

    let decode = |segment: &str| {
        urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .map_err(|e| CacheError::InvalidArgument(format!("bad path encoding: {}", e)))
    };

    Ok((decode(group)?, decode(key)?))
}

/// Handler for GET /api/:group/:key
///
/// Client-facing read through the group.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let group = state.group(&group_name)?;
    let value = group.get(&key).await?;

    Ok(Json(GetResponse::new(group_name, key, &value)))
}

/// Handler for GET /stats
///
/// Returns statistics of every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<Vec<GroupStatsResponse>> {
    let stats = state
        .registry
        .groups()
        .iter()
        .map(|group| GroupStatsResponse::new(group.name(), group.stats()))
        .collect();

    Json(stats)
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
