//! Vault service implementation.

use std::future::Future;
use std::sync::Arc;

use docvault_shared::types::{DocumentId, UserId};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::VaultError;
use super::types::UploadRequest;
use crate::document::{Document, DocumentOwner, DocumentPatch, ListFilter, NewDocument, UploadStatus};
use crate::mime::{format_file_size, mime_type_from_extension};
use crate::stats::StorageUsage;
use crate::store::VaultStore;

/// Upload, preview, listing, and deletion flows over a [`VaultStore`].
#[derive(Debug, Clone)]
pub struct VaultService {
    store: Arc<VaultStore>,
}

impl VaultService {
    /// Create a new vault service.
    #[must_use]
    pub fn new(store: Arc<VaultStore>) -> Self {
        Self { store }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<VaultStore> {
        &self.store
    }

    /// Stores the payload and records a pending document.
    ///
    /// The document stays out of listings until [`Self::confirm_upload`]
    /// succeeds. An empty content type is replaced by a guess from the
    /// filename. Generated storage keys are unique per upload.
    ///
    /// Uploads are serialized from the quota check through the metadata write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or an explicit storage key is blank
    /// - The size is zero or above the configured maximum
    /// - A personal vault upload would go over the uploader's quota
    pub fn upload(&self, request: UploadRequest) -> Result<Document, VaultError> {
        let _guard = self.store.lock_uploads();
        self.validate(&request)?;

        let mime_type = if request.content_type.trim().is_empty() {
            mime_type_from_extension(&request.name).to_string()
        } else {
            request.content_type
        };

        let storage_key = request.storage_key.unwrap_or_else(|| {
            format!(
                "{}/{}-{}-{}",
                request.owner.storage_prefix(&request.uploaded_by),
                self.store.clock().now().timestamp_millis(),
                Uuid::now_v7().simple(),
                request.name
            )
        });

        self.store
            .blobs()
            .put(storage_key.clone(), request.payload, mime_type.clone(), request.size);

        let mut input = NewDocument::new(
            request.name,
            mime_type,
            request.size,
            storage_key,
            request.owner,
            request.uploaded_by,
        )
        .with_status(UploadStatus::Pending)
        .with_tags(request.tags);
        input.folder_id = request.folder_id;
        input.expires_at = request.expires_at;

        let document = self.store.documents().create(input);
        info!(
            document_id = %document.id,
            storage_key = %document.storage_key,
            size = %format_file_size(document.size),
            "Upload stored, awaiting confirmation"
        );
        Ok(document)
    }

    fn validate(&self, request: &UploadRequest) -> Result<(), VaultError> {
        if request.name.trim().is_empty() {
            return Err(VaultError::validation("name is required"));
        }
        if request
            .storage_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(VaultError::validation("storage key must not be blank"));
        }
        if request.size == 0 {
            return Err(VaultError::validation("file is empty"));
        }

        let max = self.store.max_file_size();
        if request.size > max {
            return Err(VaultError::FileTooLarge {
                size: request.size,
                max,
            });
        }

        if matches!(request.owner, DocumentOwner::Vault(_)) {
            let usage = self.store.stats().usage(&request.uploaded_by);
            if usage.would_exceed(request.size) {
                return Err(VaultError::QuotaExceeded {
                    used: usage.used,
                    requested: request.size,
                    total: usage.total,
                });
            }
        }
        Ok(())
    }

    /// Confirms an upload once its payload is verified in the blob store.
    ///
    /// Verification fails when the blob is missing or its recorded size differs
    /// from the document's. A failed verification marks the document `failed`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document not found
    /// - Payload missing or size mismatch
    pub fn confirm_upload(&self, id: DocumentId) -> Result<Document, VaultError> {
        let document = self.get(id)?;

        let stored_size = self.store.blobs().size_of(&document.storage_key);
        if stored_size != Some(document.size) {
            warn!(
                document_id = %id,
                storage_key = %document.storage_key,
                expected = document.size,
                actual = ?stored_size,
                "Upload not verified"
            );
            self.set_status(id, UploadStatus::Failed)?;
            return Err(VaultError::UploadNotVerified);
        }

        let confirmed = self.set_status(id, UploadStatus::Confirmed)?;
        info!(document_id = %id, "Upload confirmed");
        Ok(confirmed)
    }

    /// Marks an upload as failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not found.
    pub fn fail_upload(&self, id: DocumentId) -> Result<Document, VaultError> {
        let failed = self.set_status(id, UploadStatus::Failed)?;
        info!(document_id = %id, "Upload marked failed");
        Ok(failed)
    }

    fn set_status(&self, id: DocumentId, status: UploadStatus) -> Result<Document, VaultError> {
        self.update(id, DocumentPatch::status(status))
    }

    /// Resolves a preview URL for a document.
    ///
    /// `fallback` is only called when neither the cache nor the blob store can
    /// answer; it stands in for the external presigning service.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document not found
    /// - No URL could be resolved for its storage key
    pub async fn preview_url<F, Fut>(&self, id: DocumentId, fallback: F) -> Result<String, VaultError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        let document = self.get(id)?;
        let url = self
            .store
            .url_cache()
            .resolve(&document.storage_key, fallback)
            .await;
        url.ok_or_else(|| VaultError::file_not_found(document.storage_key))
    }

    /// Deletes a document, its blob, and any cached URL for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not found.
    pub fn delete(&self, id: DocumentId) -> Result<(), VaultError> {
        let document = self.get(id)?;
        if !self.store.documents().delete(id) {
            return Err(VaultError::not_found(id));
        }
        self.store.url_cache().invalidate(&document.storage_key);
        Ok(())
    }

    /// Finds a document in any status.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not found.
    pub fn get(&self, id: DocumentId) -> Result<Document, VaultError> {
        self.store
            .documents()
            .get(id)
            .ok_or_else(|| VaultError::not_found(id))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not found.
    pub fn update(&self, id: DocumentId, patch: DocumentPatch) -> Result<Document, VaultError> {
        self.store
            .documents()
            .update(id, patch)
            .ok_or_else(|| VaultError::not_found(id))
    }

    /// Lists confirmed documents, newest first.
    #[must_use]
    pub fn list(&self, filter: &ListFilter) -> Vec<Document> {
        self.store.documents().list(filter)
    }

    /// Storage used by `user_id` against the quota.
    #[must_use]
    pub fn usage(&self, user_id: &UserId) -> StorageUsage {
        self.store.stats().usage(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use chrono::{TimeZone, Utc};
    use docvault_shared::config::{CacheConfig, StorageConfig};

    struct Harness {
        clock: Arc<ManualClock>,
        service: VaultService,
    }

    fn harness_with(storage: StorageConfig) -> Harness {
        let start = Utc.with_ymd_and_hms(2025, 4, 2, 14, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let store = VaultStore::with_settings(clock.clone(), &storage, &CacheConfig::default());
        Harness {
            clock,
            service: VaultService::new(Arc::new(store)),
        }
    }

    fn harness() -> Harness {
        harness_with(StorageConfig::default())
    }

    fn org_upload(name: &str) -> UploadRequest {
        UploadRequest::new(name, &b"payload"[..], DocumentOwner::organization("42"), "u1")
    }

    #[test]
    fn test_upload_creates_pending_document_and_blob() {
        let h = harness();
        let doc = h
            .service
            .upload(org_upload("invoice.pdf").with_content_type("application/pdf"))
            .unwrap();

        assert_eq!(doc.upload_status, UploadStatus::Pending);
        assert_eq!(doc.size, 7);
        assert!(doc.storage_key.starts_with("org/42/1743604200000-"));
        assert!(doc.storage_key.ends_with("-invoice.pdf"));
        assert!(h.service.store().blobs().contains(&doc.storage_key));
        assert!(h.service.list(&ListFilter::new()).is_empty());
    }

    #[tokio::test]
    async fn test_same_name_uploads_in_one_instant_keep_separate_blobs() {
        let h = harness();
        let a = h
            .service
            .upload(org_upload("a.txt").with_content_type("text/plain"))
            .unwrap();
        let b = h
            .service
            .upload(
                UploadRequest::new("a.txt", &b"other"[..], DocumentOwner::organization("42"), "u2")
                    .with_content_type("text/plain"),
            )
            .unwrap();
        assert_eq!(a.created_at, h.clock.now());
        assert_eq!(b.created_at, h.clock.now());
        assert_ne!(a.storage_key, b.storage_key);
        h.service.confirm_upload(a.id).unwrap();
        h.service.confirm_upload(b.id).unwrap();

        let a_url = h
            .service
            .preview_url(a.id, |_| std::future::ready(None))
            .await
            .unwrap();
        assert_eq!(a_url, "data:text/plain;base64,cGF5bG9hZA==");

        h.service.delete(a.id).unwrap();

        assert_eq!(h.service.list(&ListFilter::new()).len(), 1);
        assert!(h.service.store().blobs().contains(&b.storage_key));
        let b_url = h
            .service
            .preview_url(b.id, |_| std::future::ready(None))
            .await
            .unwrap();
        assert_eq!(b_url, "data:text/plain;base64,b3RoZXI=");
    }

    #[test]
    fn test_upload_guesses_missing_content_type() {
        let h = harness();
        let doc = h.service.upload(org_upload("Budget.XLSX")).unwrap();

        assert_eq!(
            doc.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let blob = h.service.store().blobs().get(&doc.storage_key).unwrap();
        assert_eq!(blob.content_type, doc.mime_type);
    }

    #[test]
    fn test_upload_keeps_explicit_key_and_folder() {
        let h = harness();
        let doc = h
            .service
            .upload(
                org_upload("a.txt")
                    .with_storage_key("custom/a.txt")
                    .in_folder("archive")
                    .with_tags(["q1"]),
            )
            .unwrap();

        assert_eq!(doc.storage_key, "custom/a.txt");
        assert_eq!(doc.folder_id.as_ref().map(|f| f.as_str()), Some("archive"));
        assert!(doc.tags.contains("q1"));
    }

    #[test]
    fn test_upload_validation() {
        let h = harness();

        let err = h.service.upload(org_upload("  ")).unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));

        let err = h
            .service
            .upload(org_upload("a.txt").with_storage_key(""))
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));

        let err = h
            .service
            .upload(UploadRequest::new(
                "empty.txt",
                Vec::<u8>::new(),
                DocumentOwner::organization("42"),
                "u1",
            ))
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));

        assert!(h.service.store().documents().is_empty());
        assert!(h.service.store().blobs().is_empty());
    }

    #[test]
    fn test_upload_too_large() {
        let h = harness_with(StorageConfig {
            quota_bytes: 1_000,
            max_file_size: 4,
        });

        let err = h.service.upload(org_upload("a.txt")).unwrap_err();
        assert_eq!(err, VaultError::FileTooLarge { size: 7, max: 4 });
    }

    #[test]
    fn test_quota_applies_to_personal_vaults_only() {
        let h = harness_with(StorageConfig {
            quota_bytes: 10,
            max_file_size: 100,
        });
        let vault_upload = |name: &str| {
            UploadRequest::new(name, &b"payload"[..], DocumentOwner::vault("v1"), "u1")
        };

        h.service.upload(vault_upload("a.txt")).unwrap();
        let err = h.service.upload(vault_upload("b.txt")).unwrap_err();
        assert_eq!(
            err,
            VaultError::QuotaExceeded {
                used: 7,
                requested: 7,
                total: 10
            }
        );

        assert!(h.service.upload(org_upload("c.txt")).is_ok());
    }

    #[test]
    fn test_confirm_makes_document_listable() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt")).unwrap();

        let confirmed = h.service.confirm_upload(doc.id).unwrap();

        assert!(confirmed.is_confirmed());
        assert_eq!(h.service.list(&ListFilter::new().organization("42")).len(), 1);
    }

    #[test]
    fn test_confirm_without_blob_marks_failed() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt")).unwrap();
        h.service.store().blobs().delete(&doc.storage_key);

        let err = h.service.confirm_upload(doc.id).unwrap_err();

        assert_eq!(err, VaultError::UploadNotVerified);
        assert_eq!(
            h.service.get(doc.id).unwrap().upload_status,
            UploadStatus::Failed
        );
        assert!(h.service.list(&ListFilter::new()).is_empty());
    }

    #[test]
    fn test_confirm_with_size_mismatch_marks_failed() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt").with_size(9)).unwrap();
        h.service
            .store()
            .blobs()
            .put(doc.storage_key.clone(), &b"short"[..], "text/plain", 5);

        assert_eq!(
            h.service.confirm_upload(doc.id).unwrap_err(),
            VaultError::UploadNotVerified
        );
    }

    #[test]
    fn test_unknown_ids() {
        let h = harness();
        let id = DocumentId::new();

        assert_eq!(h.service.confirm_upload(id).unwrap_err(), VaultError::NotFound(id));
        assert_eq!(h.service.fail_upload(id).unwrap_err(), VaultError::NotFound(id));
        assert_eq!(h.service.delete(id).unwrap_err(), VaultError::NotFound(id));
    }

    #[test]
    fn test_fail_upload() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt")).unwrap();

        let failed = h.service.fail_upload(doc.id).unwrap();
        assert_eq!(failed.upload_status, UploadStatus::Failed);
    }

    #[tokio::test]
    async fn test_preview_url_prefers_local_blob() {
        let h = harness();
        let doc = h
            .service
            .upload(org_upload("a.txt").with_content_type("text/plain"))
            .unwrap();

        let url = h
            .service
            .preview_url(doc.id, |_| std::future::ready(None))
            .await
            .unwrap();
        assert_eq!(url, "data:text/plain;base64,cGF5bG9hZA==");
    }

    #[tokio::test]
    async fn test_preview_url_file_not_found() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt")).unwrap();
        h.service.store().blobs().delete(&doc.storage_key);

        let err = h
            .service
            .preview_url(doc.id, |_| std::future::ready(None))
            .await
            .unwrap_err();
        assert_eq!(err, VaultError::file_not_found(doc.storage_key));
    }

    #[tokio::test]
    async fn test_delete_drops_cached_url() {
        let h = harness();
        let doc = h.service.upload(org_upload("a.txt")).unwrap();
        h.service
            .preview_url(doc.id, |_| std::future::ready(None))
            .await
            .unwrap();
        assert!(h.service.store().url_cache().peek(&doc.storage_key).is_some());

        h.service.delete(doc.id).unwrap();

        assert!(h.service.store().url_cache().peek(&doc.storage_key).is_none());
        assert!(!h.service.store().blobs().contains(&doc.storage_key));
        assert!(h.service.get(doc.id).is_err());
    }

    #[test]
    fn test_usage_passthrough() {
        let h = harness();
        h.service.upload(org_upload("a.txt")).unwrap();
        assert_eq!(h.service.usage(&UserId::new("u1")).used, 7);
    }
}
