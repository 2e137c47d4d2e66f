use super::*;
use crate::lifecycle::LifecycleEvent;
use crate::model::{AlternateIdentifier, DoiStatus};
use crate::test_utils::{doi, Fixture};
use chrono::Utc;

#[tokio::test]
async fn test_unknown_doi_not_applicable() {
    let fixture = Fixture::new();
    let outcome = fixture.repair().repair(&doi("10.15468/none")).await.unwrap();
    assert_eq!(outcome, RepairOutcome::NotApplicable);
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_reassertion_is_idempotent() {
    let fixture = Fixture::new();
    let d = doi("10.15468/abc");
    let dataset = fixture.dataset_with_doi(&d).await;
    let engine = fixture.repair();

    for _ in 0..3 {
        assert_eq!(engine.repair(&d).await.unwrap(), RepairOutcome::Fixed);
    }

    let events = fixture.lifecycle.events().await;
    assert_eq!(events.len(), 3);
    for event in events {
        assert_eq!(event, LifecycleEvent::dataset(&dataset, None));
    }
}

#[tokio::test]
async fn test_changed_to_external_doi_replayed() {
    let fixture = Fixture::new();
    let old = doi("10.15468/old");
    let current = doi("10.5061/dryad.x");
    let dataset = fixture.dataset_with_changed_doi(&old, &current).await;

    let outcome = fixture.repair().repair(&old).await.unwrap();

    assert_eq!(outcome, RepairOutcome::Fixed);
    assert_eq!(
        fixture.lifecycle.events().await,
        vec![LifecycleEvent::dataset(&dataset, Some(&old))]
    );
}

#[tokio::test]
async fn test_changed_to_local_doi_unsupported() {
    let fixture = Fixture::new();
    let old = doi("10.15468/old");
    let current = doi("10.15468/new");
    fixture.dataset_with_changed_doi(&old, &current).await;

    let outcome = fixture.repair().repair(&old).await.unwrap();

    assert_eq!(
        outcome,
        RepairOutcome::Unsupported(UnsupportedReason::ChangedToLocallyIssued)
    );
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_current_doi_in_alternates_unsupported() {
    let fixture = Fixture::new();
    let old = doi("10.15468/old");
    let current = doi("10.5061/dryad.x");
    fixture
        .store
        .insert_doi(&old, DoiType::Dataset, DoiStatus::Failed, None)
        .await;
    fixture
        .store
        .insert_dataset(
            Dataset::new(Uuid::new_v4(), "Both listed", Some(current.clone()))
                .with_alternate(AlternateIdentifier::doi(&old))
                .with_alternate(AlternateIdentifier::doi(&current)),
        )
        .await;

    let outcome = fixture.repair().repair(&old).await.unwrap();

    assert_eq!(
        outcome,
        RepairOutcome::Unsupported(UnsupportedReason::AlternateIdentifiersUnexpected)
    );
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_old_doi_not_in_alternates_finds_no_owner() {
    let fixture = Fixture::new();
    let old = doi("10.15468/old");
    fixture
        .store
        .insert_doi(&old, DoiType::Dataset, DoiStatus::Failed, None)
        .await;
    fixture
        .store
        .insert_dataset(Dataset::new(
            Uuid::new_v4(),
            "Unrelated",
            Some(doi("10.5061/dryad.x")),
        ))
        .await;

    let outcome = fixture.repair().repair(&old).await.unwrap();

    assert_eq!(outcome, RepairOutcome::NotApplicable);
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_dataset_without_current_doi_unsupported() {
    let fixture = Fixture::new();
    let old = doi("10.15468/old");
    fixture
        .store
        .insert_doi(&old, DoiType::Dataset, DoiStatus::Failed, None)
        .await;
    fixture
        .store
        .insert_dataset(
            Dataset::new(Uuid::new_v4(), "No DOI", None)
                .with_alternate(AlternateIdentifier::doi(&old)),
        )
        .await;

    let outcome = fixture.repair().repair(&old).await.unwrap();
    assert_eq!(
        outcome,
        RepairOutcome::Unsupported(UnsupportedReason::NoCurrentDoi)
    );
}

#[tokio::test]
async fn test_two_active_owners_ambiguous() {
    let fixture = Fixture::new();
    let d = doi("10.15468/shared");
    let first = fixture.dataset_with_doi(&d).await;
    let second = Dataset::new(Uuid::new_v4(), "Second", Some(doi("10.5061/other")))
        .with_alternate(AlternateIdentifier::doi(&d));
    fixture.store.insert_dataset(second.clone()).await;

    let outcome = fixture.repair().repair(&d).await.unwrap();

    assert_eq!(
        outcome,
        RepairOutcome::Ambiguous {
            owners: vec![first.key, second.key]
        }
    );
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_only_deleted_owners_not_applicable() {
    let fixture = Fixture::new();
    let d = doi("10.15468/gone");
    fixture
        .store
        .insert_doi(&d, DoiType::Dataset, DoiStatus::Failed, None)
        .await;
    fixture
        .store
        .insert_dataset(
            Dataset::new(Uuid::new_v4(), "Deleted", Some(d.clone())).with_deleted(Utc::now()),
        )
        .await;

    let outcome = fixture.repair().repair(&d).await.unwrap();
    assert_eq!(outcome, RepairOutcome::NotApplicable);
    assert_eq!(fixture.lifecycle.count().await, 0);
}

#[tokio::test]
async fn test_deleted_duplicate_does_not_block_repair() {
    let fixture = Fixture::new();
    let d = doi("10.15468/abc");
    fixture.dataset_with_doi(&d).await;
    fixture
        .store
        .insert_dataset(
            Dataset::new(Uuid::new_v4(), "Old copy", Some(d.clone())).with_deleted(Utc::now()),
        )
        .await;

    assert_eq!(
        fixture.repair().repair(&d).await.unwrap(),
        RepairOutcome::Fixed
    );
}

#[tokio::test]
async fn test_download_terminal_states_repaired() {
    for status in [DownloadStatus::Succeeded, DownloadStatus::FileErased] {
        let fixture = Fixture::new();
        let d = doi("10.15468/dl.abc");
        let download = fixture.download_with_doi(&d, status).await;

        assert_eq!(
            fixture.repair().repair(&d).await.unwrap(),
            RepairOutcome::Fixed
        );
        match fixture.lifecycle.events().await.as_slice() {
            [LifecycleEvent::DownloadChanged {
                download_key,
                previous_doi,
                user,
                ..
            }] => {
                assert_eq!(download_key, &download.key);
                assert!(previous_doi.is_none());
                assert_eq!(user, "alice");
            }
            other => panic!("unexpected events {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_download_non_terminal_states_unsupported() {
    for status in DownloadStatus::ALL
        .iter()
        .copied()
        .filter(|s| !s.is_terminal_success())
    {
        let fixture = Fixture::new();
        let d = doi("10.15468/dl.busy");
        fixture.download_with_doi(&d, status).await;

        assert_eq!(
            fixture.repair().repair(&d).await.unwrap(),
            RepairOutcome::Unsupported(UnsupportedReason::DownloadNotTerminal(status))
        );
        assert_eq!(fixture.lifecycle.count().await, 0);
    }
}

#[tokio::test]
async fn test_download_creator_missing() {
    let fixture = Fixture::new();
    let d = doi("10.15468/dl.orphan");
    fixture
        .store
        .insert_doi(&d, DoiType::Download, DoiStatus::Failed, None)
        .await;
    fixture
        .store
        .insert_download(crate::model::Download {
            key: "0000002".to_string(),
            doi: Some(d.clone()),
            status: DownloadStatus::Succeeded,
            creator: "bob".to_string(),
        })
        .await;

    assert_eq!(
        fixture.repair().repair(&d).await.unwrap(),
        RepairOutcome::Unsupported(UnsupportedReason::CreatorNotFound("bob".to_string()))
    );
}

#[tokio::test]
async fn test_other_types_not_applicable() {
    let fixture = Fixture::new();
    let d = doi("10.15468/derived");
    fixture
        .store
        .insert_doi(&d, DoiType::DerivedDataset, DoiStatus::Failed, None)
        .await;

    assert_eq!(
        fixture.repair().repair(&d).await.unwrap(),
        RepairOutcome::NotApplicable
    );
}

#[tokio::test]
async fn test_lifecycle_failure_is_an_error() {
    let fixture = Fixture::new();
    let d = doi("10.15468/abc");
    fixture.dataset_with_doi(&d).await;
    fixture.lifecycle.set_fail(true).await;

    assert!(matches!(
        fixture.repair().repair(&d).await,
        Err(RepairError::Lifecycle(_))
    ));
}

#[test]
fn test_unsupported_reason_messages() {
    assert_eq!(
        UnsupportedReason::ChangedToLocallyIssued.to_string(),
        "DOI changed to a locally-issued DOI"
    );
    assert_eq!(
        UnsupportedReason::AlternateIdentifiersUnexpected.to_string(),
        "alternate identifiers not in the expected known-safe state"
    );
    assert_eq!(
        UnsupportedReason::DownloadNotTerminal(DownloadStatus::Running).to_string(),
        "download not in a terminal success state (RUNNING)"
    );
}
