//! Bounded decode cache with request coalescing
//!
//! SVG decoding is the expensive step between markup and renderable bytes, so
//! all decodes go through a [`DecodeCache`]: resolved payloads are kept in a
//! bounded LRU store, and concurrent requests for a key that is still being
//! decoded share the single in-flight decode instead of starting their own.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use lru::LruCache;

use crate::error::DecodeError;
use crate::key::{CacheKey, SvgTheme};
use crate::payload::Payload;

/// Default maximum number of decoded payloads kept resident
pub const DEFAULT_CAPACITY: usize = 100;

/// Handle to an in-flight decode, cloned to every caller waiting on the key
type InFlightDecode = Shared<BoxFuture<'static, Result<Payload, DecodeError>>>;

/// Cache tables, guarded as one unit
///
/// Both tables live under a single lock: the coalescing guarantee depends on
/// "is this key pending or stored?" and "register a new decode" happening
/// atomically. A key is in at most one of the two tables at any time.
struct CacheState {
    capacity: usize,
    /// Resolved payloads in recency order. `None` iff capacity is zero, since
    /// the store rejects a zero capacity.
    stored: Option<LruCache<CacheKey, Payload>>,
    /// Decodes that have been started but not yet settled
    pending: HashMap<CacheKey, InFlightDecode>,
}

impl CacheState {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            stored: NonZeroUsize::new(capacity).map(LruCache::new),
            pending: HashMap::new(),
        }
    }

    /// Install a resolved payload at the most-recently-used position
    ///
    /// With a zero capacity the payload is not retained at all. At capacity,
    /// the least-recently-used entry is dropped to make room.
    fn install(&mut self, key: CacheKey, payload: Payload) {
        if let Some(stored) = self.stored.as_mut() {
            stored.put(key, payload);
        }
    }

    fn len(&self) -> usize {
        self.stored.as_ref().map(LruCache::len).unwrap_or(0)
    }
}

/// Bounded, request-coalescing LRU cache for decoded SVG payloads
///
/// The cache is a cheap clonable handle; clones see the same entries. Widgets
/// normally share one instance per application (see
/// [`shared_cache`](crate::shared_cache)), while tests construct their own.
///
/// # Example
///
/// ```ignore
/// use plume_cache::{CacheKey, DecodeCache, Payload, SvgSource, SvgTheme};
///
/// let cache = DecodeCache::default();
/// let key = CacheKey::new(SvgSource::asset("icons/home.svg"), SvgTheme::default());
/// let payload = cache.get(&key, || compile_svg(key.clone())).await?;
/// ```
#[derive(Clone)]
pub struct DecodeCache {
    state: Arc<Mutex<CacheState>>,
}

impl DecodeCache {
    /// Create a cache holding at most `capacity` decoded payloads
    ///
    /// A zero capacity is valid: every decode still runs and resolves, but
    /// nothing is retained.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::with_capacity(capacity))),
        }
    }

    /// Fetch the payload for `key`, decoding it if necessary
    ///
    /// A stored payload is returned without suspending and without invoking
    /// `decode`; the lookup moves the entry to most-recently-used. If a decode
    /// for the key is already in flight, this call awaits that decode instead
    /// of starting another, and resolves to the same payload or error. Only
    /// when the key is absent everywhere is `decode` invoked, once, to build
    /// the decode future; the future itself runs as a spawned task, so it
    /// completes (and the result is installed) even if every caller stops
    /// waiting.
    ///
    /// A failed decode settles every waiting caller with the same error and
    /// leaves nothing behind for the key, so the next call retries from
    /// scratch.
    ///
    /// Must be called from within a Tokio runtime. `decode` is only invoked to
    /// construct the future and must not block or call back into the cache.
    pub async fn get<F, Fut>(&self, key: &CacheKey, decode: F) -> Result<Payload, DecodeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Payload, DecodeError>> + Send + 'static,
    {
        let in_flight = {
            let mut state = self.state.lock().unwrap();

            if let Some(in_flight) = state.pending.get(key) {
                in_flight.clone()
            } else if let Some(payload) = state.stored.as_mut().and_then(|s| s.get(key)) {
                return Ok(payload.clone());
            } else {
                tracing::trace!("decode cache miss, starting decode");
                let decode_task = tokio::spawn(decode());

                let state_handle = Arc::clone(&self.state);
                let task_key = key.clone();
                let in_flight: InFlightDecode = async move {
                    let result = match decode_task.await {
                        Ok(result) => result,
                        Err(e) => Err(DecodeError::Task(e.to_string())),
                    };

                    // Settle the key under the lock: the pending slot goes away
                    // in the same step that makes the outcome observable, so no
                    // caller can see both.
                    let mut state = state_handle.lock().unwrap();
                    state.pending.remove(&task_key);
                    match result {
                        Ok(payload) => {
                            state.install(task_key, payload.clone());
                            Ok(payload)
                        }
                        Err(e) => {
                            tracing::debug!("SVG decode failed: {}", e);
                            Err(e)
                        }
                    }
                }
                .boxed()
                .shared();

                state.pending.insert(key.clone(), in_flight.clone());
                in_flight
            }
        };

        in_flight.await
    }

    /// Remove the stored payload for `key`, reporting whether one was removed
    ///
    /// An in-flight decode for the key is not affected and not cancelled.
    pub fn evict(&self, key: &CacheKey) -> bool {
        let mut state = self.state.lock().unwrap();
        state
            .stored
            .as_mut()
            .map(|stored| stored.pop(key).is_some())
            .unwrap_or(false)
    }

    /// Evict `key` if the change from `old_theme` to `new_theme` invalidates it
    ///
    /// Decoded bytes bake in theme values, so today any theme change evicts:
    /// the two themes are accepted but not yet compared. A real compatibility
    /// check may narrow this later; callers should not rely on the
    /// unconditional behavior.
    pub fn maybe_evict(
        &self,
        key: &CacheKey,
        old_theme: &SvgTheme,
        new_theme: &SvgTheme,
    ) -> bool {
        let _ = (old_theme, new_theme);
        self.evict(key)
    }

    /// Drop every stored payload
    ///
    /// Decodes in flight are unaffected; they settle normally and may install
    /// their results afterwards.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state.stored.as_mut() {
            stored.clear();
        }
    }

    /// Maximum number of payloads kept resident
    pub fn capacity(&self) -> usize {
        self.state.lock().unwrap().capacity
    }

    /// Change the capacity, taking effect immediately
    ///
    /// Shrinking below the resident count evicts least-recently-used entries
    /// until the new bound holds. A zero capacity clears the store and keeps
    /// it empty until the capacity is raised again.
    pub fn set_capacity(&self, capacity: usize) {
        let mut state = self.state.lock().unwrap();
        if capacity == state.capacity {
            return;
        }

        match NonZeroUsize::new(capacity) {
            Some(cap) => match state.stored.as_mut() {
                Some(stored) => stored.resize(cap),
                None => state.stored = Some(LruCache::new(cap)),
            },
            None => state.stored = None,
        }
        state.capacity = capacity;
    }

    /// Number of payloads currently resident
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    /// Whether no payloads are resident
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a payload for `key` is resident, without touching recency
    pub fn contains(&self, key: &CacheKey) -> bool {
        let state = self.state.lock().unwrap();
        state
            .stored
            .as_ref()
            .map(|stored| stored.contains(key))
            .unwrap_or(false)
    }
}

impl Default for DecodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
