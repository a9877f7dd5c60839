//! Vault service for document management.
//!
//! This module ties the storage components into the user-facing flows:
//! - Upload with validation and quota checks
//! - Upload confirmation against the blob store
//! - Preview URL resolution
//! - Listing, usage, and deletion

mod error;
mod service;
mod types;

pub use error::VaultError;
pub use service::VaultService;
pub use types::UploadRequest;
