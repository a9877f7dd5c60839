//! Vault error types.

use docvault_shared::AppError;
use docvault_shared::types::DocumentId;
use thiserror::Error;

/// Vault operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// No URL could be resolved for the storage key.
    #[error("file not found: {key}")]
    FileNotFound {
        /// Storage key that failed to resolve.
        key: String,
    },

    /// Upload not verified - payload missing from the blob store.
    #[error("upload not verified: file not found in storage")]
    UploadNotVerified,

    /// File too large.
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Upload would go over the user's storage quota.
    #[error("storage quota exceeded: {used} bytes used, {requested} requested, {total} allowed")]
    QuotaExceeded {
        /// Bytes already used.
        used: u64,
        /// Bytes requested.
        requested: u64,
        /// Quota in bytes.
        total: u64,
    },

    /// Request failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl VaultError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: DocumentId) -> Self {
        Self::NotFound(id)
    }

    /// Create a file not found error.
    #[must_use]
    pub fn file_not_found(key: impl Into<String>) -> Self {
        Self::FileNotFound { key: key.into() }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<VaultError> for AppError {
    fn from(err: VaultError) -> Self {
        let msg = err.to_string();
        match err {
            VaultError::NotFound(_) | VaultError::FileNotFound { .. } => Self::NotFound(msg),
            VaultError::UploadNotVerified | VaultError::Validation(_) => Self::Validation(msg),
            VaultError::FileTooLarge { .. } | VaultError::QuotaExceeded { .. } => {
                Self::StorageLimit(msg)
            }
        }
    }
}
