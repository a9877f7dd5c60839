//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an `OrganizationId` is expected.
//!
//! Document IDs are minted here and wrap a time-ordered UUID. Every other ID is
//! supplied by an external collaborator (auth, org management, folder tree) and
//! is treated as an opaque string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix used when rendering a [`DocumentId`].
const DOCUMENT_ID_PREFIX: &str = "doc_";

/// Macro to generate UUID-backed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0.simple())
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix($prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(raw)?))
            }
        }
    };
}

/// Macro to generate wrappers around externally assigned string IDs.
macro_rules! string_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an externally assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(
    DocumentId,
    DOCUMENT_ID_PREFIX,
    "Unique identifier for a document metadata record."
);

string_id!(UserId, "Identifier of the user who uploaded a document.");
string_id!(OrganizationId, "Identifier of an organization that owns documents.");
string_id!(VaultId, "Identifier of a personal (non-organizational) vault.");
string_id!(FolderId, "Identifier of a folder inside a vault or organization.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_document_id_display_has_prefix() {
        let id = DocumentId::new();
        let rendered = id.to_string();
        assert!(rendered.starts_with("doc_"));
        assert_eq!(rendered.len(), "doc_".len() + 32);
    }

    #[test]
    fn test_document_id_from_str_roundtrip() {
        let id = DocumentId::new();
        let parsed = DocumentId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_document_id_from_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed = DocumentId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(parsed.into_inner(), uuid);
    }

    #[test]
    fn test_document_id_from_str_error() {
        assert!(DocumentId::from_str("doc_not-a-uuid").is_err());
    }

    #[test]
    fn test_string_id_is_opaque() {
        let org = OrganizationId::new("42");
        assert_eq!(org.as_str(), "42");
        assert_eq!(org.to_string(), "42");
        assert_eq!(OrganizationId::from("42"), org);
    }

    #[test]
    fn test_string_id_serializes_transparently() {
        let folder = FolderId::new("archive");
        let json = serde_json::to_string(&folder).unwrap();
        assert_eq!(json, "\"archive\"");
    }
}
