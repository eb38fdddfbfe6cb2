//! API Routes
//!
//! Configures the Axum router with the peer and client endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{get_handler, health_handler, peer_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET {base_path}{group}/{key}` - Peer fetch, protobuf body
/// - `GET /api/:group/:key` - Read a value through the group
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin on the client-facing routes
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let client_routes = Router::new()
        .route("/api/:group/:key", get(get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors);

    // The bare prefix has no group or key and is answered 400 by the handler
    let peer_routes = Router::new()
        .route(&state.base_path, get(peer_handler))
        .route(&format!("{}*path", state.base_path), get(peer_handler));

    Router::new()
        .merge(client_routes)
        .merge(peer_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{GetterFn, GroupRegistry};
    use crate::models::Response;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use prost::Message;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Arc::new(GroupRegistry::new());
        registry.new_group(
            "scores",
            0,
            GetterFn::new(|key| match key {
                "alice" => Ok(b"41".to_vec()),
                "a b/c" => Ok(b"spaced".to_vec()),
                _ => Err(anyhow::anyhow!("{} not exist", key)),
            }),
        );
        create_router(AppState::with_default_base_path(registry))
    }

    async fn get_status(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _) = get_status(create_test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_peer_endpoint_success() {
        let (status, body) = get_status(create_test_app(), "/_peercache/scores/alice").await;

        assert_eq!(status, StatusCode::OK);
        let decoded = Response::decode(body.as_slice()).unwrap();
        assert_eq!(decoded.value, b"41");
    }

    #[tokio::test]
    async fn test_peer_endpoint_decodes_key() {
        let (status, body) =
            get_status(create_test_app(), "/_peercache/scores/a%20b%2Fc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(Response::decode(body.as_slice()).unwrap().value, b"spaced");
    }

    #[tokio::test]
    async fn test_peer_endpoint_malformed_path() {
        let (status, _) = get_status(create_test_app(), "/_peercache/scores").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_status(create_test_app(), "/_peercache/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_peer_endpoint_empty_key() {
        let (status, _) = get_status(create_test_app(), "/_peercache/scores/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_peer_endpoint_unknown_group() {
        let (status, _) = get_status(create_test_app(), "/_peercache/nope/alice").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_peer_endpoint_loader_error() {
        let (status, _) = get_status(create_test_app(), "/_peercache/scores/bob").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
