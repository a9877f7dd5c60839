//! Storage core for Docvault.
//!
//! This crate holds the in-process state behind the document vault with ZERO
//! web or database dependencies. All state lives for the process lifetime.
//!
//! # Modules
//!
//! - `blob` - Opaque payload storage addressed by storage key
//! - `document` - Document metadata, upload lifecycle, filtered listing
//! - `preview` - Time-bounded cache of resolved preview URLs
//! - `stats` - Per-user storage usage against a quota
//! - `fixtures` - Demo data seeding
//! - `vault` - Upload, preview, listing, and deletion flows
//! - `store` - Shared context wiring the components together
//! - `clock` - Injectable time source
//! - `mime` - Filename and size helpers

pub mod blob;
pub mod clock;
pub mod document;
pub mod fixtures;
pub mod mime;
pub mod preview;
pub mod stats;
pub mod store;
pub mod vault;

pub use store::VaultStore;
pub use vault::{UploadRequest, VaultError, VaultService};
