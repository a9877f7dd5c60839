//! Resolved preview URL caching using Moka.
//!
//! Resolving a preview URL can mean calling out to a presigning service, so
//! results are kept for a short window and handed back without further work
//! while they are fresh.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::{debug, warn};

use crate::blob::BlobStore;
use crate::clock::SharedClock;

/// Default maximum number of cached URLs.
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default validity window for a resolved URL (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// A resolved URL and when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUrl {
    /// Resolved locator.
    pub url: String,
    /// Resolution time.
    pub resolved_at: DateTime<Utc>,
}

impl CachedUrl {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.resolved_at < ttl
    }
}

/// Cache of storage key to resolved access URL.
///
/// Freshness is judged against the injected clock on every lookup. Nothing
/// sweeps stale entries in the background: a stale entry stays until the next
/// lookup for its key overwrites it, or until capacity pressure evicts it.
/// Eviction is least-recently-used, so a freshly resolved URL is always
/// admitted and only ever displaces older entries.
#[derive(Clone)]
pub struct PresignedUrlCache {
    cache: Cache<String, CachedUrl>,
    blobs: Arc<BlobStore>,
    clock: SharedClock,
    ttl: Duration,
}

impl PresignedUrlCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 10 000 entries max, 5 minute validity.
    #[must_use]
    pub fn new(blobs: Arc<BlobStore>, clock: SharedClock) -> Self {
        Self::with_config(blobs, clock, DEFAULT_TTL_SECS, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache with custom validity window and capacity.
    #[must_use]
    pub fn with_config(
        blobs: Arc<BlobStore>,
        clock: SharedClock,
        ttl_secs: u64,
        max_capacity: u64,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);

        Self {
            cache,
            blobs,
            clock,
            ttl,
        }
    }

    /// Resolves an access URL for `key`.
    ///
    /// Order of preference:
    /// 1. a cached URL younger than the validity window;
    /// 2. the blob store's own locator;
    /// 3. `fallback`, standing in for an external presigning call.
    ///
    /// Successful resolutions from 2 and 3 are cached. A miss everywhere
    /// returns `None` and is not cached, so the next call tries again.
    /// `fallback` is awaited as-is: timeouts and retries are its business.
    pub async fn resolve<F, Fut>(&self, key: &str, fallback: F) -> Option<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        if let Some(cached) = self.cache.get(key) {
            if cached.is_fresh(self.clock.now(), self.ttl) {
                debug!(storage_key = %key, "Preview URL cache hit");
                return Some(cached.url);
            }
            debug!(storage_key = %key, "Preview URL cache entry stale");
        }

        let url = if let Some(url) = self.blobs.resolve_url(key) {
            url
        } else {
            debug!(storage_key = %key, "Blob not held locally, asking resolver");
            match fallback(key.to_string()).await {
                Some(url) => url,
                None => {
                    warn!(storage_key = %key, "File not found");
                    return None;
                }
            }
        };

        self.cache.insert(
            key.to_string(),
            CachedUrl {
                url: url.clone(),
                resolved_at: self.clock.now(),
            },
        );
        Some(url)
    }

    /// Returns the cached entry for `key`, fresh or not.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<CachedUrl> {
        self.cache.get(key)
    }

    /// Drops the cached entry for `key`.
    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    /// Drops every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks so counts and evictions settle.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl std::fmt::Debug for PresignedUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresignedUrlCache")
            .field("entries", &self.cache.entry_count())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
