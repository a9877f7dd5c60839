//! Blob types.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// An opaque stored payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Storage key.
    pub key: String,
    /// Raw file contents.
    pub payload: Bytes,
    /// Content type reported at upload.
    pub content_type: String,
    /// Size in bytes reported at upload.
    pub size: u64,
    /// When the payload was written.
    pub uploaded_at: DateTime<Utc>,
}
