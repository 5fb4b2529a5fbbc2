//! Path match caching.
//!
//! This module provides [`MatchCache`], an LRU cache that remembers which
//! registered page a path resolved to, so repeated navigation to the same
//! path skips the linear walk over the registry. It is gated behind the
//! `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Only the page position and the **raw** parameters are cached; the page's
//! mapper still runs on every lookup. Entries are never stale because a
//! registry is frozen once it is handed to [`PageSync`](crate::PageSync).
//!
//! [`CacheStats`] tracks hits and misses so you can monitor cache
//! effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use page_navigator::cache::MatchCache;
//! use page_navigator::PageParams;
//!
//! let mut cache = MatchCache::new();
//! cache.insert("/posts/3".to_string(), 1, PageParams::new().with("id", "3"));
//!
//! assert_eq!(cache.get("/posts/3").unwrap().0, 1);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{trace_log, PageParams};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cached result of matching one path
#[derive(Debug, Clone)]
struct CachedMatch {
    index: usize,
    params: PageParams,
}

/// Counters tracking cache hit/miss rates.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that fell through to the registry.
    pub misses: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from path to matched page position and raw parameters.
#[derive(Debug)]
pub struct MatchCache {
    entries: LruCache<String, CachedMatch>,
    stats: CacheStats,
}

impl MatchCache {
    /// Default number of cached paths.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding up to `capacity` paths (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::MIN.saturating_add(capacity.saturating_sub(1));
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached page position and raw parameters for `path`.
    ///
    /// Returns `None` on a cache miss. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<(usize, PageParams)> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Match cache hit for path: '{}'", path);
            Some((entry.index, entry.params.clone()))
        } else {
            self.stats.misses += 1;
            trace_log!("Match cache miss for path: '{}'", path);
            None
        }
    }

    /// Remember that `path` matched the page at `index`.
    pub fn insert(&mut self, path: String, index: usize, params: PageParams) {
        trace_log!("Caching page position {} for path '{}'", index, path);
        self.entries.push(path, CachedMatch { index, params });
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters in [`CacheStats`] to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Return the number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the maximum number of cached paths.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for MatchCache {
    fn default() -> Self {
        Self::new()
    }
}
