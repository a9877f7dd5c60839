//! Document metadata: records, lifecycle, and filtered listing.
//!
//! A document is created `pending`, moves to `confirmed` once its payload
//! write has been validated (or to `failed`), can be patched at any time, and
//! is destroyed only by an explicit delete that cascades to its blob.

pub mod filter;
pub mod repository;
pub mod types;

#[cfg(test)]
mod repository_props;

pub use filter::{FolderFilter, ListFilter};
pub use repository::DocumentRepository;
pub use types::{Document, DocumentOwner, DocumentPatch, NewDocument, UploadStatus};
