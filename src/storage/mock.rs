//! In-memory identifier store for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::identifier_store::{IdentifierStore, Page, Result, StoreError};
use crate::model::{Dataset, Doi, DoiRecord, DoiStatus, DoiType, Download, User};

#[derive(Default)]
struct Tables {
    dois: HashMap<Doi, (DoiRecord, Option<String>)>,
    datasets: Vec<Dataset>,
    downloads: Vec<Download>,
    users: HashMap<String, User>,
}

/// Mock identifier store that keeps everything in memory.
#[derive(Default)]
pub struct MockIdentifierStore {
    tables: RwLock<Tables>,
    unavailable: RwLock<bool>,
}

impl MockIdentifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    pub async fn insert_doi(
        &self,
        doi: &Doi,
        doi_type: DoiType,
        status: DoiStatus,
        metadata: Option<&str>,
    ) {
        let record = DoiRecord {
            doi: doi.clone(),
            doi_type,
            status,
            target: None,
        };
        self.insert_record(record, metadata).await;
    }

    pub async fn insert_record(&self, record: DoiRecord, metadata: Option<&str>) {
        self.tables
            .write()
            .await
            .dois
            .insert(record.doi.clone(), (record, metadata.map(str::to_string)));
    }

    pub async fn insert_dataset(&self, dataset: Dataset) {
        let mut tables = self.tables.write().await;
        tables.datasets.retain(|d| d.key != dataset.key);
        tables.datasets.push(dataset);
    }

    pub async fn insert_download(&self, download: Download) {
        let mut tables = self.tables.write().await;
        tables.downloads.retain(|d| d.key != download.key);
        tables.downloads.push(download);
    }

    pub async fn insert_user(&self, user: User) {
        self.tables
            .write()
            .await
            .users
            .insert(user.name.clone(), user);
    }

    async fn check_available(&self) -> Result<()> {
        if *self.unavailable.read().await {
            return Err(StoreError::Unavailable(
                "mock store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentifierStore for MockIdentifierStore {
    async fn get(&self, doi: &Doi) -> Result<Option<DoiRecord>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables.dois.get(doi).map(|(record, _)| record.clone()))
    }

    async fn get_metadata(&self, doi: &Doi) -> Result<Option<String>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables.dois.get(doi).and_then(|(_, xml)| xml.clone()))
    }

    async fn list_by_status(
        &self,
        status: DoiStatus,
        doi_type: Option<DoiType>,
        page: Option<Page>,
    ) -> Result<Vec<(Doi, DoiType)>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        let mut matches: Vec<(Doi, DoiType)> = tables
            .dois
            .values()
            .map(|(record, _)| record)
            .filter(|r| r.status == status)
            .filter(|r| doi_type.map_or(true, |t| r.doi_type == t))
            .map(|r| (r.doi.clone(), r.doi_type))
            .collect();
        matches.sort();

        Ok(match page {
            Some(page) => matches
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => matches,
        })
    }

    async fn list_datasets_by_primary(&self, doi: &Doi) -> Result<Vec<Dataset>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .datasets
            .iter()
            .filter(|d| d.doi.as_ref() == Some(doi))
            .cloned()
            .collect())
    }

    async fn list_datasets_by_alternate(&self, doi: &Doi) -> Result<Vec<Dataset>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .datasets
            .iter()
            .filter(|d| d.has_alternate_doi(doi))
            .cloned()
            .collect())
    }

    async fn get_download_by_doi(&self, doi: &Doi) -> Result<Option<Download>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .downloads
            .iter()
            .find(|d| d.doi.as_ref() == Some(doi))
            .cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables.users.get(name).cloned())
    }
}
