//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Endpoints
//! - `GET {base_path}{group}/{key}` - Peer fetch (protobuf `Response` body)
//! - `GET /api/:group/:key` - Read a value through a group (JSON)
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
