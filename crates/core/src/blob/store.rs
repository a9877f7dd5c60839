//! In-memory blob store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use super::types::Blob;
use crate::clock::SharedClock;

/// Keyed storage of opaque payloads.
///
/// Stands in for a cloud object store. Writes are last-write-wins and every
/// operation is total over the key space: a missing key is reported as
/// `None`/`false`, never as an error.
#[derive(Debug)]
pub struct BlobStore {
    blobs: DashMap<String, Blob>,
    clock: SharedClock,
}

impl BlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self {
            blobs: DashMap::new(),
            clock,
        }
    }

    /// Stores `payload` under `key`, replacing whatever was there.
    pub fn put(
        &self,
        key: impl Into<String>,
        payload: impl Into<Bytes>,
        content_type: impl Into<String>,
        size: u64,
    ) {
        let uploaded_at = self.clock.now();
        self.put_at(key, payload, content_type, size, uploaded_at);
    }

    /// Stores `payload` under `key` with an explicit upload timestamp.
    pub fn put_at(
        &self,
        key: impl Into<String>,
        payload: impl Into<Bytes>,
        content_type: impl Into<String>,
        size: u64,
        uploaded_at: DateTime<Utc>,
    ) {
        let key = key.into();
        let blob = Blob {
            key: key.clone(),
            payload: payload.into(),
            content_type: content_type.into(),
            size,
            uploaded_at,
        };

        if self.blobs.insert(key.clone(), blob).is_some() {
            debug!(storage_key = %key, size, "Blob overwritten");
        } else {
            debug!(storage_key = %key, size, "Blob stored");
        }
    }

    /// Returns the blob stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Blob> {
        self.blobs.get(key).map(|entry| entry.value().clone())
    }

    /// Removes the blob stored under `key`. Returns `true` if one was removed.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.blobs.remove(key).is_some();
        debug!(storage_key = %key, removed, "Blob delete");
        removed
    }

    /// Resolves a locator for the blob under `key`.
    ///
    /// The locator is a `data:` URL carrying the payload itself. A deployment
    /// backed by a real object store hands out a short-lived signed URL here
    /// instead; callers only rely on getting something resolvable back.
    #[must_use]
    pub fn resolve_url(&self, key: &str) -> Option<String> {
        self.blobs.get(key).map(|entry| {
            let blob = entry.value();
            format!(
                "data:{};base64,{}",
                blob.content_type,
                STANDARD.encode(&blob.payload)
            )
        })
    }

    /// Returns the recorded size of the blob under `key`.
    #[must_use]
    pub fn size_of(&self, key: &str) -> Option<u64> {
        self.blobs.get(key).map(|entry| entry.size)
    }

    /// Returns true if a blob is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Removes every blob.
    pub fn clear(&self) {
        self.blobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn store() -> BlobStore {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        BlobStore::new(Arc::new(ManualClock::new(start)))
    }

    #[test]
    fn test_put_then_get() {
        let store = store();
        store.put("org/42/invoice.pdf", &b"%PDF-1.4"[..], "application/pdf", 1024);

        let blob = store.get("org/42/invoice.pdf").unwrap();
        assert_eq!(blob.key, "org/42/invoice.pdf");
        assert_eq!(blob.payload, Bytes::from_static(b"%PDF-1.4"));
        assert_eq!(blob.content_type, "application/pdf");
        assert_eq!(blob.size, 1024);
        assert_eq!(
            blob.uploaded_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_get_missing_is_none() {
        assert!(store().get("nope").is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let store = store();
        store.put("k", &b"one"[..], "text/plain", 3);
        store.put("k", &b"second"[..], "text/markdown", 6);

        let blob = store.get("k").unwrap();
        assert_eq!(blob.payload, Bytes::from_static(b"second"));
        assert_eq!(blob.content_type, "text/markdown");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_reports_removal() {
        let store = store();
        store.put("k", &b"x"[..], "text/plain", 1);

        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_resolve_url_is_data_url() {
        let store = store();
        store.put("notes.txt", &b"hello"[..], "text/plain", 5);

        let url = store.resolve_url("notes.txt").unwrap();
        assert_eq!(url, "data:text/plain;base64,aGVsbG8=");
    }

    #[test]
    fn test_resolve_url_missing() {
        assert!(store().resolve_url("missing").is_none());
    }

    #[test]
    fn test_size_of_and_clear() {
        let store = store();
        store.put("a", &b"aa"[..], "text/plain", 2);
        store.put("b", &b"bbb"[..], "text/plain", 3);

        assert_eq!(store.size_of("b"), Some(3));
        assert_eq!(store.size_of("c"), None);
        assert!(store.contains("a"));

        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains("a"));
    }
}
