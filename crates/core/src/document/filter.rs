//! Listing filters.

use docvault_shared::types::{FolderId, OrganizationId, VaultId};

use super::types::Document;

/// Folder constraint for a listing.
///
/// "Any folder" and "root only" are different requests and must stay
/// distinguishable, so this is a tri-state rather than an `Option<FolderId>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderFilter {
    /// No folder constraint.
    #[default]
    Any,
    /// Only documents at the root (no folder).
    Root,
    /// Only documents in this folder.
    Folder(FolderId),
}

impl FolderFilter {
    /// Returns true if `folder_id` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, folder_id: Option<&FolderId>) -> bool {
        match self {
            Self::Any => true,
            Self::Root => folder_id.is_none(),
            Self::Folder(wanted) => folder_id == Some(wanted),
        }
    }
}

impl From<Option<FolderId>> for FolderFilter {
    /// `Some(id)` filters by that folder; `None` means the root.
    fn from(folder: Option<FolderId>) -> Self {
        folder.map_or(Self::Root, Self::Folder)
    }
}

/// Filter for document listings.
///
/// Every populated criterion must hold. Non-confirmed documents never match,
/// whatever the filter says.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to this personal vault.
    pub vault_id: Option<VaultId>,
    /// Restrict to this organization.
    pub organization_id: Option<OrganizationId>,
    /// Folder constraint.
    pub folder: FolderFilter,
    /// Restrict to root-level documents. Stacks with `folder`.
    pub root_only: bool,
}

impl ListFilter {
    /// Creates a filter that matches every confirmed document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a personal vault.
    #[must_use]
    pub fn vault(mut self, id: impl Into<VaultId>) -> Self {
        self.vault_id = Some(id.into());
        self
    }

    /// Restricts to an organization.
    #[must_use]
    pub fn organization(mut self, id: impl Into<OrganizationId>) -> Self {
        self.organization_id = Some(id.into());
        self
    }

    /// Restricts to a single folder.
    #[must_use]
    pub fn folder(mut self, id: impl Into<FolderId>) -> Self {
        self.folder = FolderFilter::Folder(id.into());
        self
    }

    /// Sets the folder constraint directly.
    #[must_use]
    pub fn folder_filter(mut self, folder: FolderFilter) -> Self {
        self.folder = folder;
        self
    }

    /// Restricts to root-level documents.
    #[must_use]
    pub fn root_only(mut self, root_only: bool) -> Self {
        self.root_only = root_only;
        self
    }

    /// Returns true if `doc` belongs in a listing with this filter.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        if self
            .vault_id
            .as_ref()
            .is_some_and(|id| doc.personal_vault_id() != Some(id))
        {
            return false;
        }
        if self
            .organization_id
            .as_ref()
            .is_some_and(|id| doc.organization_id() != Some(id))
        {
            return false;
        }
        if !self.folder.matches(doc.folder_id.as_ref()) {
            return false;
        }
        if self.root_only && !doc.is_root() {
            return false;
        }
        doc.is_confirmed()
    }
}
