//! Error types for the peer cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP layer.
///
/// `Clone` because one in-flight load result is handed to every caller
/// waiting on the same key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key or malformed request path
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown group (namespace)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure or non-200 status from a peer
    #[error("Peer unavailable: {0}")]
    RemoteUnavailable(String),

    /// Peer answered with a body that is not a valid response message
    #[error("Peer response decode failed: {0}")]
    RemoteDecode(String),

    /// The group's loader failed
    #[error("Source error: {0}")]
    Source(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::RemoteUnavailable(_)
            | CacheError::RemoteDecode(_)
            | CacheError::Source(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the peer cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CacheError::Source("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                CacheError::RemoteUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
