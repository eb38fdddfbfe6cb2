//! Message models
//!
//! Protobuf messages exchanged between peers, and the JSON DTOs returned by
//! the client-facing endpoints.

pub mod responses;
pub mod wire;

// Re-export commonly used types
pub use responses::{GetResponse, GroupStatsResponse, HealthResponse};
pub use wire::{Request, Response};
