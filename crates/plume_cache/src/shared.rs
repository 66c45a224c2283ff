//! Process-wide decode cache for application wiring
//!
//! The cache itself is instance-based: widgets and tests that want isolation
//! construct their own [`DecodeCache`] and pass it around. This module is the
//! wiring-layer default for everything else — one lazily created cache per
//! process, shared by all widgets that do not carry an explicit one.

use std::sync::OnceLock;

use crate::cache::DecodeCache;

/// Global decode cache instance
static SHARED_CACHE: OnceLock<DecodeCache> = OnceLock::new();

/// Get the process-wide decode cache, creating it on first use
///
/// The cache is created with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY);
/// use [`DecodeCache::set_capacity`] to tune it at startup.
pub fn shared_cache() -> &'static DecodeCache {
    SHARED_CACHE.get_or_init(DecodeCache::default)
}
