//! Shared ownership of decoded byte payloads

use std::sync::Arc;

/// Decoded output of one SVG compile, shared read-only by every holder
///
/// The decoder hands the bytes over exactly once; after that the buffer is
/// immutable and cloning is a reference-count bump, never a byte copy. The
/// cache and all requesters of the same key therefore share one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Arc<[u8]>,
}

impl Payload {
    /// Take ownership of decoded bytes
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The decoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of decoded bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the decode produced no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
