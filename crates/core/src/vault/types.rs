//! Upload request types.

use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use docvault_shared::types::{FolderId, UserId};

use crate::document::DocumentOwner;

/// Input for uploading a document.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub name: String,
    /// MIME type as reported by the client. Empty means unknown.
    pub content_type: String,
    /// Declared size in bytes.
    pub size: u64,
    /// File contents.
    pub payload: Bytes,
    /// Explicit storage key. Generated from owner and name when `None`.
    pub storage_key: Option<String>,
    /// Owning vault or organization.
    pub owner: DocumentOwner,
    /// Target folder, `None` for the root.
    pub folder_id: Option<FolderId>,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl UploadRequest {
    /// Creates a root-level upload whose size is the payload length.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        payload: impl Into<Bytes>,
        owner: DocumentOwner,
        uploaded_by: impl Into<UserId>,
    ) -> Self {
        let payload = payload.into();
        Self {
            name: name.into(),
            content_type: String::new(),
            size: payload.len() as u64,
            payload,
            storage_key: None,
            owner,
            folder_id: None,
            uploaded_by: uploaded_by.into(),
            tags: BTreeSet::new(),
            expires_at: None,
        }
    }

    /// Sets the client-reported MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Overrides the declared size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Uses an explicit storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Places the document in a folder.
    #[must_use]
    pub fn in_folder(mut self, folder_id: impl Into<FolderId>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Adds tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets an expiry.
    #[must_use]
    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}
