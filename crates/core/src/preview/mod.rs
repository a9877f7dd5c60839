//! Preview URL resolution.
//!
//! ```text
//! resolve(key) ──► cache (fresh?) ──► BlobStore::resolve_url ──► fallback resolver
//!                      │ hit                 │ hit                    │ hit / miss
//!                      ▼                     ▼                        ▼
//!                     url              cache + url              cache + url / None
//! ```

mod cache;

pub use cache::{CachedUrl, PresignedUrlCache};
