//! Per-user storage usage.

use std::sync::Arc;

use docvault_shared::config::StorageConfig;
use docvault_shared::types::UserId;
use serde::Serialize;

use crate::document::DocumentRepository;

/// Bytes used against the quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageUsage {
    /// Bytes used.
    pub used: u64,
    /// Quota in bytes.
    pub total: u64,
}

impl StorageUsage {
    /// Bytes still available, zero once the quota is exceeded.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }

    /// Returns true if adding `size` bytes would go over the quota.
    #[must_use]
    pub const fn would_exceed(&self, size: u64) -> bool {
        match self.used.checked_add(size) {
            Some(after) => after > self.total,
            None => true,
        }
    }
}

/// Sums document sizes per uploader.
#[derive(Debug, Clone)]
pub struct StorageStatsCalculator {
    documents: Arc<DocumentRepository>,
    quota_bytes: u64,
}

impl StorageStatsCalculator {
    /// Creates a calculator with the default quota.
    #[must_use]
    pub fn new(documents: Arc<DocumentRepository>) -> Self {
        Self::with_quota(documents, StorageConfig::DEFAULT_QUOTA_BYTES)
    }

    /// Creates a calculator with a custom quota.
    #[must_use]
    pub fn with_quota(documents: Arc<DocumentRepository>, quota_bytes: u64) -> Self {
        Self {
            documents,
            quota_bytes,
        }
    }

    /// Usage for `user_id`.
    ///
    /// Counts every document the user uploaded, whatever its upload status, so
    /// pending and failed uploads count against the quota too.
    #[must_use]
    pub fn usage(&self, user_id: &UserId) -> StorageUsage {
        let used = self
            .documents
            .all()
            .iter()
            .filter(|doc| &doc.uploaded_by == user_id)
            .fold(0u64, |sum, doc| sum.saturating_add(doc.size));

        StorageUsage {
            used,
            total: self.quota_bytes,
        }
    }

    /// Configured quota.
    #[must_use]
    pub const fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }
}
