//! Document types and data structures.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use docvault_shared::types::{DocumentId, FolderId, OrganizationId, UserId, VaultId};
use serde::{Deserialize, Serialize};

/// Upload lifecycle of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Metadata recorded, payload write not yet validated.
    #[default]
    Pending,
    /// Payload write validated; the document is listable.
    Confirmed,
    /// Payload write failed validation.
    Failed,
}

impl UploadStatus {
    /// Convert to its string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }

    /// Parse from its string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container a document belongs to.
///
/// A document lives in exactly one personal vault or exactly one
/// organization, never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentOwner {
    /// Personal vault.
    Vault(VaultId),
    /// Organization.
    Organization(OrganizationId),
}

impl DocumentOwner {
    /// Personal vault owner.
    #[must_use]
    pub fn vault(id: impl Into<VaultId>) -> Self {
        Self::Vault(id.into())
    }

    /// Organization owner.
    #[must_use]
    pub fn organization(id: impl Into<OrganizationId>) -> Self {
        Self::Organization(id.into())
    }

    /// The vault ID, if this is a personal vault.
    #[must_use]
    pub fn personal_vault_id(&self) -> Option<&VaultId> {
        match self {
            Self::Vault(id) => Some(id),
            Self::Organization(_) => None,
        }
    }

    /// The organization ID, if this is an organization.
    #[must_use]
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        match self {
            Self::Organization(id) => Some(id),
            Self::Vault(_) => None,
        }
    }

    /// Storage key prefix for payloads uploaded by `uploader` into this owner.
    ///
    /// Personal vault payloads live under the uploader, not the vault.
    #[must_use]
    pub fn storage_prefix(&self, uploader: &UserId) -> String {
        match self {
            Self::Vault(_) => format!("personal/{uploader}"),
            Self::Organization(id) => format!("org/{id}"),
        }
    }
}

/// Input for creating a document record.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Display filename.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Key of the blob holding the payload.
    pub storage_key: String,
    /// Owning vault or organization.
    pub owner: DocumentOwner,
    /// Folder, `None` for the root.
    pub folder_id: Option<FolderId>,
    /// User who uploaded.
    pub uploaded_by: UserId,
    /// Initial upload status.
    pub upload_status: UploadStatus,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewDocument {
    /// Creates a pending root-level document with no tags or expiry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        storage_key: impl Into<String>,
        owner: DocumentOwner,
        uploaded_by: impl Into<UserId>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            storage_key: storage_key.into(),
            owner,
            folder_id: None,
            uploaded_by: uploaded_by.into(),
            upload_status: UploadStatus::Pending,
            tags: BTreeSet::new(),
            expires_at: None,
        }
    }

    /// Places the document in a folder.
    #[must_use]
    pub fn in_folder(mut self, folder_id: impl Into<FolderId>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Sets the initial upload status.
    #[must_use]
    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.upload_status = status;
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

/// Document metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: DocumentId,
    /// Display filename.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Key of the blob holding the payload.
    pub storage_key: String,
    /// Owning vault or organization.
    pub owner: DocumentOwner,
    /// Folder, `None` for the root.
    pub folder_id: Option<FolderId>,
    /// User who uploaded.
    pub uploaded_by: UserId,
    /// Upload status.
    pub upload_status: UploadStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Document {
    pub(crate) fn from_new(id: DocumentId, input: NewDocument, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            mime_type: input.mime_type,
            size: input.size,
            storage_key: input.storage_key,
            owner: input.owner,
            folder_id: input.folder_id,
            uploaded_by: input.uploaded_by,
            upload_status: input.upload_status,
            created_at: at,
            updated_at: at,
            tags: input.tags,
            expires_at: input.expires_at,
        }
    }

    /// Personal vault this document belongs to, if any.
    #[must_use]
    pub fn personal_vault_id(&self) -> Option<&VaultId> {
        self.owner.personal_vault_id()
    }

    /// Organization this document belongs to, if any.
    #[must_use]
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.owner.organization_id()
    }

    /// Returns true if the document sits at the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.folder_id.is_none()
    }

    /// Returns true once the upload has been confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.upload_status == UploadStatus::Confirmed
    }

    /// Shallow-merges `patch` and stamps `updated_at`.
    pub(crate) fn apply(&mut self, patch: DocumentPatch, at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(mime_type) = patch.mime_type {
            self.mime_type = mime_type;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(storage_key) = patch.storage_key {
            self.storage_key = storage_key;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(folder_id) = patch.folder_id {
            self.folder_id = folder_id;
        }
        if let Some(uploaded_by) = patch.uploaded_by {
            self.uploaded_by = uploaded_by;
        }
        if let Some(status) = patch.upload_status {
            self.upload_status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(expires_at) = patch.expires_at {
            self.expires_at = expires_at;
        }
        self.updated_at = at;
    }
}

/// Partial update for a document.
///
/// `None` leaves a field untouched. For nullable fields the inner option is the
/// new value, so `folder_id: Some(None)` moves the document to the root.
/// There is no way to change `id` or `created_at`.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    /// New display name.
    pub name: Option<String>,
    /// New MIME type.
    pub mime_type: Option<String>,
    /// New size.
    pub size: Option<u64>,
    /// New storage key.
    pub storage_key: Option<String>,
    /// New owner.
    pub owner: Option<DocumentOwner>,
    /// New folder.
    pub folder_id: Option<Option<FolderId>>,
    /// New uploader.
    pub uploaded_by: Option<UserId>,
    /// New upload status.
    pub upload_status: Option<UploadStatus>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<String>>,
    /// New expiry.
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl DocumentPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only changes the upload status.
    #[must_use]
    pub fn status(status: UploadStatus) -> Self {
        Self {
            upload_status: Some(status),
            ..Self::default()
        }
    }

    /// Renames the document.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Moves the document to `folder`, or to the root with `None`.
    #[must_use]
    pub fn move_to(mut self, folder: Option<FolderId>) -> Self {
        self.folder_id = Some(folder);
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Sets or clears the expiry.
    #[must_use]
    pub fn expires_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = Some(at);
        self
    }
}
