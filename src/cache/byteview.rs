//! Byte View Module
//!
//! Immutable view over a cached value.

use std::fmt;
use std::sync::Arc;

use super::lru::ByteSize;

// == Byte View ==
/// Immutable byte buffer handed out by the cache.
///
/// Clones share the same read-only buffer. Consumers only ever see the
/// bytes through [`ByteView::byte_slice`], which returns a fresh copy, so
/// the cached buffer cannot be mutated through an alias.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view holding a copy of `bytes`.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    // == Length ==
    /// Returns the size of the value in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Byte Slice ==
    /// Returns a copy of the underlying bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

/// Takes ownership of a buffer nobody else can reach anymore.
impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::copy_from_slice(s.as_bytes())
    }
}

/// Renders the value as text, replacing invalid UTF-8 sequences.
impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}
