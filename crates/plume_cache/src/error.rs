//! Decode cache error types

use thiserror::Error;

/// Errors surfaced when fetching a payload through the cache
///
/// Errors are `Clone` because one failed decode settles every caller that
/// coalesced onto it: each of them gets the same error value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The external decoder reported a failure
    #[error("SVG decode failed: {0}")]
    Decode(String),

    /// The decode task stopped before producing a result
    #[error("decode task failed: {0}")]
    Task(String),
}
