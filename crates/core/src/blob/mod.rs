//! Opaque payload storage addressed by storage key.
//!
//! Documents never hold a blob directly; they carry its key and look it up
//! here when a preview or delete needs it.

mod store;
mod types;

pub use store::BlobStore;
pub use types::Blob;
