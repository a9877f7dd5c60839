//! Shared storage context.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docvault_shared::AppConfig;
use docvault_shared::config::{CacheConfig, StorageConfig};

use crate::blob::BlobStore;
use crate::clock::SharedClock;
use crate::document::DocumentRepository;
use crate::fixtures::FixtureInitializer;
use crate::preview::PresignedUrlCache;
use crate::stats::StorageStatsCalculator;

/// Every storage component, wired to the same blob store and clock.
///
/// Build one per process (or per test) and share it behind an `Arc`.
#[derive(Debug)]
pub struct VaultStore {
    blobs: Arc<BlobStore>,
    documents: Arc<DocumentRepository>,
    url_cache: PresignedUrlCache,
    stats: StorageStatsCalculator,
    fixtures: FixtureInitializer,
    clock: SharedClock,
    max_file_size: u64,
    upload_lock: Mutex<()>,
}

impl VaultStore {
    /// Creates an empty store with default settings.
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self::with_settings(clock, &StorageConfig::default(), &CacheConfig::default())
    }

    /// Creates an empty store from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig, clock: SharedClock) -> Self {
        Self::with_settings(clock, &config.storage, &config.cache)
    }

    /// Creates an empty store with explicit settings.
    #[must_use]
    pub fn with_settings(clock: SharedClock, storage: &StorageConfig, cache: &CacheConfig) -> Self {
        let blobs = Arc::new(BlobStore::new(clock.clone()));
        let documents = Arc::new(DocumentRepository::new(blobs.clone(), clock.clone()));
        let url_cache = PresignedUrlCache::with_config(
            blobs.clone(),
            clock.clone(),
            cache.url_ttl_secs,
            cache.max_capacity,
        );
        let stats = StorageStatsCalculator::with_quota(documents.clone(), storage.quota_bytes);
        let fixtures = FixtureInitializer::new(blobs.clone(), documents.clone(), clock.clone());

        Self {
            blobs,
            documents,
            url_cache,
            stats,
            fixtures,
            clock,
            max_file_size: storage.max_file_size,
            upload_lock: Mutex::new(()),
        }
    }

    /// Blob store.
    #[must_use]
    pub fn blobs(&self) -> &Arc<BlobStore> {
        &self.blobs
    }

    /// Document repository.
    #[must_use]
    pub fn documents(&self) -> &Arc<DocumentRepository> {
        &self.documents
    }

    /// Preview URL cache.
    #[must_use]
    pub fn url_cache(&self) -> &PresignedUrlCache {
        &self.url_cache
    }

    /// Usage calculator.
    #[must_use]
    pub fn stats(&self) -> &StorageStatsCalculator {
        &self.stats
    }

    /// Demo fixture seeder.
    #[must_use]
    pub fn fixtures(&self) -> &FixtureInitializer {
        &self.fixtures
    }

    /// Clock every component reads.
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Largest accepted upload in bytes.
    #[must_use]
    pub const fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Held across an upload's quota check and its writes.
    pub(crate) fn lock_uploads(&self) -> MutexGuard<'_, ()> {
        self.upload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::system_clock;

    #[test]
    fn test_defaults() {
        let store = VaultStore::new(system_clock());
        assert_eq!(store.max_file_size(), 100 * 1024 * 1024);
        assert_eq!(store.stats().quota_bytes(), 5 * 1024 * 1024 * 1024);
        assert!(store.documents().is_empty());
        assert!(store.blobs().is_empty());
    }

    #[tokio::test]
    async fn test_cache_reads_the_same_blob_store() {
        let store = VaultStore::new(system_clock());
        store.blobs().put("k", &b"x"[..], "text/plain", 1);

        let url = store
            .url_cache()
            .resolve("k", |_| std::future::ready(None))
            .await;
        assert_eq!(url.as_deref(), Some("data:text/plain;base64,eA=="));
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.storage.quota_bytes = 10;
        config.storage.max_file_size = 5;

        let store = VaultStore::from_config(&config, system_clock());
        assert_eq!(store.stats().quota_bytes(), 10);
        assert_eq!(store.max_file_size(), 5);
    }
}
