//! Demo fixture seeding.
//!
//! Populates an empty store with a fixed set of sample documents so a demo
//! tenant has something to browse. Never call this outside demo environments.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Months, Utc};
use docvault_shared::types::{OrganizationId, UserId, VaultId};
use tracing::{debug, info, warn};

use crate::blob::BlobStore;
use crate::clock::SharedClock;
use crate::document::{DocumentOwner, DocumentRepository, NewDocument, UploadStatus};

/// 1x1 transparent PNG.
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0xf8, 0xcf, 0x50,
    0x0f, 0x00, 0x03, 0x86, 0x01, 0x80, 0x5a, 0x34, 0x7d, 0x6b, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<</Type/Catalog/Pages 2 0 R>>\nendobj\n2 0 obj\n<</Type/Pages/Kids[]/Count 0>>\nendobj\ntrailer\n<</Root 1 0 R>>\n%%EOF\n";

const SAMPLE_TEXT: &[u8] = b"This is a sample text file";

/// How far before "now" a fixture was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Age {
    Now,
    Yesterday,
    LastWeek,
    LastMonth,
}

impl Age {
    fn before(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Now => now,
            Self::Yesterday => now - Duration::days(1),
            Self::LastWeek => now - Duration::days(7),
            Self::LastMonth => now
                .checked_sub_months(Months::new(1))
                .unwrap_or_else(|| now - Duration::days(30)),
        }
    }
}

struct Fixture {
    name: &'static str,
    mime_type: &'static str,
    size: u64,
    payload: &'static [u8],
    age: Age,
}

// Office documents carry the PNG as placeholder content.
const FIXTURES: [Fixture; 8] = [
    Fixture {
        name: "Company Logo.png",
        mime_type: "image/png",
        size: 245_680,
        payload: SAMPLE_PNG,
        age: Age::Now,
    },
    Fixture {
        name: "Invoice-2024-001.pdf",
        mime_type: "application/pdf",
        size: 1_024_567,
        payload: SAMPLE_PDF,
        age: Age::Yesterday,
    },
    Fixture {
        name: "Contract_Template.docx",
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        size: 456_789,
        payload: SAMPLE_PNG,
        age: Age::LastWeek,
    },
    Fixture {
        name: "Financial_Report_Q4.xlsx",
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        size: 789_012,
        payload: SAMPLE_PNG,
        age: Age::LastWeek,
    },
    Fixture {
        name: "Presentation_Slides.pptx",
        mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        size: 2_345_678,
        payload: SAMPLE_PNG,
        age: Age::LastMonth,
    },
    Fixture {
        name: "Product_Photo_1.jpg",
        mime_type: "image/jpeg",
        size: 567_890,
        payload: SAMPLE_PNG,
        age: Age::LastMonth,
    },
    Fixture {
        name: "Meeting_Notes.txt",
        mime_type: "text/plain",
        size: 12_345,
        payload: SAMPLE_TEXT,
        age: Age::Now,
    },
    Fixture {
        name: "Tax_Documents_2024.pdf",
        mime_type: "application/pdf",
        size: 3_456_789,
        payload: SAMPLE_PDF,
        age: Age::Yesterday,
    },
];

/// Number of documents in the fixture set.
pub const FIXTURE_COUNT: usize = FIXTURES.len();

/// Result of [`FixtureInitializer::ensure_seeded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and has been seeded.
    Seeded {
        /// Documents created.
        count: usize,
    },
    /// Documents for another organization were found, wiped, and replaced.
    Reseeded {
        /// Documents created.
        count: usize,
        /// Organization the wiped documents belonged to.
        previous_org: OrganizationId,
    },
    /// Nothing to do.
    AlreadySeeded {
        /// Documents already present.
        count: usize,
    },
}

impl SeedOutcome {
    /// Returns true if documents were written.
    #[must_use]
    pub const fn wrote(&self) -> bool {
        !matches!(self, Self::AlreadySeeded { .. })
    }
}

/// Seeds the demo fixture set.
#[derive(Debug)]
pub struct FixtureInitializer {
    blobs: Arc<BlobStore>,
    documents: Arc<DocumentRepository>,
    clock: SharedClock,
    lock: Mutex<()>,
}

impl FixtureInitializer {
    /// Creates an initializer writing into `blobs` and `documents`.
    #[must_use]
    pub fn new(
        blobs: Arc<BlobStore>,
        documents: Arc<DocumentRepository>,
        clock: SharedClock,
    ) -> Self {
        Self {
            blobs,
            documents,
            clock,
            lock: Mutex::new(()),
        }
    }

    /// Makes sure the store holds the fixture set for `org_id`.
    ///
    /// An empty store is seeded. A store holding any organization document for
    /// a different organization is wiped (blobs included) and seeded again.
    /// Anything else is left alone, including vault-owned documents and user
    /// uploads made on top of the fixtures.
    pub fn ensure_seeded(&self, user_id: &UserId, org_id: &OrganizationId) -> SeedOutcome {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.documents.is_empty() {
            debug!(org_id = %org_id, "No documents, seeding fixtures");
            let count = self.seed(user_id, &DocumentOwner::Organization(org_id.clone()));
            return SeedOutcome::Seeded { count };
        }

        let drifted = self.documents.all().into_iter().find_map(|doc| {
            doc.organization_id()
                .filter(|existing| *existing != org_id)
                .cloned()
        });

        if let Some(previous_org) = drifted {
            warn!(
                previous_org = %previous_org,
                org_id = %org_id,
                "Fixtures belong to another organization, reseeding"
            );
            self.documents.clear();
            self.blobs.clear();
            let count = self.seed(user_id, &DocumentOwner::Organization(org_id.clone()));
            return SeedOutcome::Reseeded {
                count,
                previous_org,
            };
        }

        let count = self.documents.len();
        debug!(count, org_id = %org_id, "Fixtures already present");
        SeedOutcome::AlreadySeeded { count }
    }

    /// Seeds the fixture set into a personal vault, unconditionally.
    ///
    /// Returns the number of documents created.
    pub fn seed_vault(&self, user_id: &UserId, vault_id: &VaultId) -> usize {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.seed(user_id, &DocumentOwner::Vault(vault_id.clone()))
    }

    fn seed(&self, user_id: &UserId, owner: &DocumentOwner) -> usize {
        let now = self.clock.now();
        let prefix = owner.storage_prefix(user_id);
        let millis = now.timestamp_millis();

        for (offset, fixture) in (0i64..).zip(FIXTURES.iter()) {
            let storage_key = format!("{prefix}/{}-{}", millis + offset, fixture.name);
            let created_at = fixture.age.before(now);

            self.blobs.put_at(
                storage_key.clone(),
                fixture.payload,
                fixture.mime_type,
                fixture.size,
                created_at,
            );

            let input = NewDocument::new(
                fixture.name,
                fixture.mime_type,
                fixture.size,
                storage_key,
                owner.clone(),
                user_id.clone(),
            )
            .with_status(UploadStatus::Confirmed);
            self.documents.create_at(input, created_at);
        }

        info!(count = FIXTURE_COUNT, owner = ?owner, "Fixture documents seeded");
        FIXTURE_COUNT
    }
}
