//! Shared fixtures for service tests.

use std::sync::Arc;

use uuid::Uuid;

use crate::authority::MockAuthority;
use crate::lifecycle::{PrefixIssuer, RecordingLifecycleHandler};
use crate::model::{
    AlternateIdentifier, Dataset, Doi, DoiStatus, DoiType, Download, DownloadStatus, User,
};
use crate::services::{DiagnosticEngine, RepairEngine};
use crate::storage::MockIdentifierStore;

/// Prefix the fixture registry issues DOIs under.
pub const LOCAL_PREFIX: &str = "10.15468";

pub fn doi(s: &str) -> Doi {
    Doi::parse(s).unwrap()
}

/// Mock collaborators wired the way the binary wires the real ones.
pub struct Fixture {
    pub store: Arc<MockIdentifierStore>,
    pub authority: Arc<MockAuthority>,
    pub lifecycle: Arc<RecordingLifecycleHandler>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MockIdentifierStore::new()),
            authority: Arc::new(MockAuthority::new()),
            lifecycle: Arc::new(RecordingLifecycleHandler::new()),
        }
    }

    pub fn diagnostic(&self) -> DiagnosticEngine {
        DiagnosticEngine::new(self.store.clone(), self.authority.clone())
    }

    pub fn repair(&self) -> RepairEngine {
        RepairEngine::new(
            self.store.clone(),
            Arc::new(PrefixIssuer::new(LOCAL_PREFIX)),
            self.lifecycle.clone(),
        )
    }

    /// A registered dataset DOI owned by a fresh dataset as primary DOI.
    pub async fn dataset_with_doi(&self, doi: &Doi) -> Dataset {
        self.store
            .insert_doi(doi, DoiType::Dataset, DoiStatus::Registered, Some("<resource/>"))
            .await;
        let dataset = Dataset::new(Uuid::new_v4(), "Dataset", Some(doi.clone()));
        self.store.insert_dataset(dataset.clone()).await;
        dataset
    }

    /// A dataset whose DOI moved from `old` to `current`, `old` kept as
    /// alternate identifier.
    pub async fn dataset_with_changed_doi(&self, old: &Doi, current: &Doi) -> Dataset {
        self.store
            .insert_doi(old, DoiType::Dataset, DoiStatus::Failed, None)
            .await;
        let dataset = Dataset::new(Uuid::new_v4(), "Moved dataset", Some(current.clone()))
            .with_alternate(AlternateIdentifier::doi(old));
        self.store.insert_dataset(dataset.clone()).await;
        dataset
    }

    /// A download DOI with its download and creator account.
    pub async fn download_with_doi(&self, doi: &Doi, status: DownloadStatus) -> Download {
        self.store
            .insert_doi(doi, DoiType::Download, DoiStatus::Failed, None)
            .await;
        let download = Download {
            key: format!("0000001-{}", doi.suffix()),
            doi: Some(doi.clone()),
            status,
            creator: "alice".to_string(),
        };
        self.store.insert_download(download.clone()).await;
        self.store
            .insert_user(User {
                name: "alice".to_string(),
                email: Some("alice@example.org".to_string()),
            })
            .await;
        download
    }
}
