//! Property-based tests for DocumentRepository.
//!
//! Each property builds a repository from a random mix of owners, folders and
//! upload statuses, then checks a listing or lifecycle guarantee against it.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use docvault_shared::types::FolderId;
use proptest::prelude::*;

use crate::blob::BlobStore;
use crate::clock::ManualClock;
use crate::document::filter::{FolderFilter, ListFilter};
use crate::document::repository::DocumentRepository;
use crate::document::types::{DocumentOwner, NewDocument, UploadStatus};

#[derive(Debug, Clone)]
struct DocCase {
    owner: DocumentOwner,
    folder: Option<FolderId>,
    status: UploadStatus,
    minutes_later: i64,
}

fn arb_owner() -> impl Strategy<Value = DocumentOwner> {
    prop_oneof![
        Just(DocumentOwner::organization("42")),
        Just(DocumentOwner::organization("7")),
        Just(DocumentOwner::vault("v1")),
        Just(DocumentOwner::vault("v2")),
    ]
}

fn arb_folder() -> impl Strategy<Value = Option<FolderId>> {
    prop_oneof![
        Just(None),
        Just(Some(FolderId::new("archive"))),
        Just(Some(FolderId::new("receipts"))),
    ]
}

fn arb_status() -> impl Strategy<Value = UploadStatus> {
    prop_oneof![
        Just(UploadStatus::Pending),
        Just(UploadStatus::Confirmed),
        Just(UploadStatus::Failed),
    ]
}

fn arb_case() -> impl Strategy<Value = DocCase> {
    (arb_owner(), arb_folder(), arb_status(), 0i64..10_000).prop_map(
        |(owner, folder, status, minutes_later)| DocCase {
            owner,
            folder,
            status,
            minutes_later,
        },
    )
}

fn arb_filter() -> impl Strategy<Value = ListFilter> {
    (
        prop::option::of(prop_oneof![Just("v1"), Just("v2")]),
        prop::option::of(prop_oneof![Just("42"), Just("7")]),
        prop_oneof![
            Just(FolderFilter::Any),
            Just(FolderFilter::Root),
            Just(FolderFilter::Folder(FolderId::new("archive"))),
        ],
        any::<bool>(),
    )
        .prop_map(|(vault, org, folder, root_only)| {
            let mut filter = ListFilter::new().folder_filter(folder).root_only(root_only);
            if let Some(vault) = vault {
                filter = filter.vault(vault);
            }
            if let Some(org) = org {
                filter = filter.organization(org);
            }
            filter
        })
}

fn build(cases: &[DocCase]) -> (Arc<BlobStore>, DocumentRepository) {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let blobs = Arc::new(BlobStore::new(clock.clone()));
    let repo = DocumentRepository::new(blobs.clone(), clock);

    for (i, case) in cases.iter().enumerate() {
        let key = format!("k/{i}");
        blobs.put(key.clone(), vec![0u8; 4], "application/octet-stream", 4);
        let mut input = NewDocument::new(
            format!("doc-{i}"),
            "application/octet-stream",
            4,
            key,
            case.owner.clone(),
            "u1",
        )
        .with_status(case.status);
        input.folder_id = case.folder.clone();
        repo.create_at(input, start + Duration::minutes(case.minutes_later));
    }
    (blobs, repo)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Listings never surface a document that is not confirmed.
    #[test]
    fn prop_list_only_confirmed(
        cases in prop::collection::vec(arb_case(), 0..30),
        filter in arb_filter(),
    ) {
        let (_, repo) = build(&cases);
        for doc in repo.list(&filter) {
            prop_assert_eq!(doc.upload_status, UploadStatus::Confirmed);
        }
    }

    /// Organization and vault criteria are always honoured.
    #[test]
    fn prop_owner_criteria_hold(
        cases in prop::collection::vec(arb_case(), 0..30),
        filter in arb_filter(),
    ) {
        let (_, repo) = build(&cases);
        for doc in repo.list(&filter) {
            if let Some(org) = &filter.organization_id {
                prop_assert_eq!(doc.organization_id(), Some(org));
            }
            if let Some(vault) = &filter.vault_id {
                prop_assert_eq!(doc.personal_vault_id(), Some(vault));
            }
        }
    }

    /// Root-only listings contain only root documents.
    #[test]
    fn prop_root_only_has_no_folder(
        cases in prop::collection::vec(arb_case(), 0..30),
        filter in arb_filter(),
    ) {
        let (_, repo) = build(&cases);
        let filter = filter.root_only(true);
        for doc in repo.list(&filter) {
            prop_assert!(doc.folder_id.is_none());
        }
    }

    /// The listing is exactly the matching confirmed set, newest first.
    #[test]
    fn prop_list_is_complete_and_sorted(
        cases in prop::collection::vec(arb_case(), 0..30),
        filter in arb_filter(),
    ) {
        let (_, repo) = build(&cases);
        let listed = repo.list(&filter);

        let expected = repo.all().into_iter().filter(|d| filter.matches(d)).count();
        prop_assert_eq!(listed.len(), expected);

        for pair in listed.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    /// Creation always yields equal timestamps.
    #[test]
    fn prop_created_equals_updated(cases in prop::collection::vec(arb_case(), 1..10)) {
        let (_, repo) = build(&cases);
        for doc in repo.all() {
            let stored = repo.get(doc.id).unwrap();
            prop_assert_eq!(stored.created_at, stored.updated_at);
        }
    }

    /// Deleting removes both the record and its blob.
    #[test]
    fn prop_delete_removes_record_and_blob(
        cases in prop::collection::vec(arb_case(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let (blobs, repo) = build(&cases);
        let all = repo.all();
        let victim = &all[pick.index(all.len())];

        prop_assert!(repo.delete(victim.id));
        prop_assert!(repo.get(victim.id).is_none());
        prop_assert!(blobs.get(&victim.storage_key).is_none());
        prop_assert_eq!(repo.len(), cases.len() - 1);
        prop_assert_eq!(blobs.len(), cases.len() - 1);
    }
}
