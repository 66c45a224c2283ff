//! Decode result caching for Plume SVG widgets
//!
//! Compiling SVG markup into renderable bytes is the expensive step of
//! showing a vector asset, so every decode in Plume runs through a
//! [`DecodeCache`]: a bounded LRU store of decoded payloads keyed by the
//! source data plus the theme and color-mapping configuration that went into
//! the decode. Concurrent requests for the same key coalesce onto a single
//! decode, hits resolve synchronously, and failures propagate to every
//! waiter without being cached.
//!
//! The decoder itself is external — callers hand `get` a closure producing
//! the decode future, and the cache only manages sharing, storage, and
//! eviction.
//!
//! # Example
//!
//! ```ignore
//! use plume_cache::{CacheKey, DecodeCache, SvgSource, SvgTheme};
//!
//! let cache = DecodeCache::default();
//! let key = CacheKey::new(SvgSource::asset("icons/home.svg"), SvgTheme::default());
//!
//! // First call decodes; later calls for the same key are cache hits.
//! let payload = cache.get(&key, || compile_svg(key.clone())).await?;
//! ```

mod cache;
mod error;
mod key;
mod payload;
mod shared;

pub use cache::{DecodeCache, DEFAULT_CAPACITY};
pub use error::DecodeError;
pub use key::{CacheKey, Color, ColorMapperId, SvgSource, SvgTheme};
pub use payload::Payload;
pub use shared::shared_cache;
