//! In-memory document metadata repository.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use docvault_shared::types::DocumentId;
use tracing::{debug, info};

use super::filter::ListFilter;
use super::types::{Document, DocumentPatch, NewDocument};
use crate::blob::BlobStore;
use crate::clock::SharedClock;

/// Metadata catalogue for stored documents.
///
/// Owns document identity and the upload lifecycle. The only dependency on the
/// blob store is the cascade in [`DocumentRepository::delete`].
#[derive(Debug)]
pub struct DocumentRepository {
    documents: DashMap<DocumentId, Document>,
    blobs: Arc<BlobStore>,
    clock: SharedClock,
}

impl DocumentRepository {
    /// Creates an empty repository cascading deletes into `blobs`.
    #[must_use]
    pub fn new(blobs: Arc<BlobStore>, clock: SharedClock) -> Self {
        Self {
            documents: DashMap::new(),
            blobs,
            clock,
        }
    }

    /// Creates a document with a fresh ID, stamped with the current time.
    ///
    /// The storage key is not checked; callers follow the pending-then-confirm
    /// protocol and verify the blob before confirming.
    pub fn create(&self, input: NewDocument) -> Document {
        let now = self.clock.now();
        self.create_at(input, now)
    }

    /// Creates a document whose `created_at` and `updated_at` are `at`.
    pub fn create_at(&self, input: NewDocument, at: DateTime<Utc>) -> Document {
        let id = DocumentId::new();
        let document = Document::from_new(id, input, at);
        self.documents.insert(id, document.clone());

        info!(
            document_id = %id,
            name = %document.name,
            status = %document.upload_status,
            "Document created"
        );
        document
    }

    /// Lists confirmed documents matching `filter`, newest first.
    #[must_use]
    pub fn list(&self, filter: &ListFilter) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        sort_newest_first(&mut documents);

        debug!(
            total = self.documents.len(),
            returned = documents.len(),
            ?filter,
            "Documents listed"
        );
        documents
    }

    /// Returns every document in any status, newest first.
    #[must_use]
    pub fn all(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sort_newest_first(&mut documents);
        documents
    }

    /// Finds a document by ID.
    #[must_use]
    pub fn get(&self, id: DocumentId) -> Option<Document> {
        self.documents.get(&id).map(|entry| entry.value().clone())
    }

    /// Applies `patch` to a document and refreshes `updated_at`.
    ///
    /// Returns `None` if no document has this ID.
    pub fn update(&self, id: DocumentId, patch: DocumentPatch) -> Option<Document> {
        let now = self.clock.now();
        let mut entry = self.documents.get_mut(&id)?;
        entry.apply(patch, now);

        debug!(document_id = %id, status = %entry.upload_status, "Document updated");
        Some(entry.clone())
    }

    /// Deletes a document and then its blob.
    ///
    /// Removing the metadata is what counts: if the blob is already gone the
    /// delete still succeeds, and nothing rolls the metadata back.
    pub fn delete(&self, id: DocumentId) -> bool {
        let Some((_, document)) = self.documents.remove(&id) else {
            debug!(document_id = %id, "Delete of unknown document");
            return false;
        };

        let blob_removed = self.blobs.delete(&document.storage_key);
        info!(
            document_id = %id,
            storage_key = %document.storage_key,
            blob_removed,
            "Document deleted"
        );
        true
    }

    /// Number of documents in any status.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Removes every document. Blobs are left alone.
    pub fn clear(&self) {
        self.documents.clear();
    }
}

fn sort_newest_first(documents: &mut [Document]) {
    documents.sort_by_key(|doc| Reverse((doc.created_at, doc.id)));
}
