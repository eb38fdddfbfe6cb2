//! Response DTOs for the client-facing API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::{ByteView, CacheStats};

/// Response body for GET /api/:group/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The group that was queried
    pub group: String,
    /// The requested key
    pub key: String,
    /// The value rendered as text
    pub value: String,
    /// Size of the value in bytes
    pub size: usize,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: &ByteView) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value: value.to_string(),
            size: value.len(),
        }
    }
}

/// One group's entry in the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub group: String,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / gets)
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Creates a new GroupStatsResponse from a stats snapshot
    pub fn new(group: impl Into<String>, stats: CacheStats) -> Self {
        Self {
            group: group.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
