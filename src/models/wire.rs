//! Peer wire messages
//!
//! Protobuf messages exchanged between nodes. Errors travel as HTTP status
//! codes, never inside the body.

/// Asks a peer for `key` in group `group`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub group: String,
    #[prost(string, tag = "2")]
    pub key: String,
}

/// Raw value bytes returned by the owning peer.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Response {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

impl Request {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}
