//! Local record store interface.

use async_trait::async_trait;

use crate::model::{Dataset, Doi, DoiRecord, DoiStatus, DoiType, Download, UnknownValue, User};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading the local record store.
///
/// Every variant aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt value in column {column}: {value}")]
    Corrupt { column: &'static str, value: String },
}

impl From<UnknownValue> for StoreError {
    fn from(err: UnknownValue) -> Self {
        StoreError::Corrupt {
            column: err.vocabulary,
            value: err.value,
        }
    }
}

/// Pagination window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    pub fn first(limit: u64) -> Self {
        Self::new(0, limit)
    }

    pub fn next(&self) -> Self {
        Self::new(self.offset + self.limit, self.limit)
    }
}

/// Read-only access to the registry's DOI table and owning entities.
///
/// Implementations:
/// - `SqliteIdentifierStore`: SQLite storage
/// - `MockIdentifierStore`: in-memory storage for tests
#[async_trait]
pub trait IdentifierStore: Send + Sync {
    /// Retrieve the DOI row, or `None` if the DOI is unknown locally.
    async fn get(&self, doi: &Doi) -> Result<Option<DoiRecord>>;

    async fn get_status(&self, doi: &Doi) -> Result<Option<DoiStatus>> {
        Ok(self.get(doi).await?.map(|record| record.status))
    }

    async fn get_type(&self, doi: &Doi) -> Result<Option<DoiType>> {
        Ok(self.get(doi).await?.map(|record| record.doi_type))
    }

    /// The registration metadata (DataCite XML) stored with the DOI.
    async fn get_metadata(&self, doi: &Doi) -> Result<Option<String>>;

    /// List DOIs with the given status, optionally restricted to a type.
    ///
    /// Results are ordered by DOI so pages are stable.
    async fn list_by_status(
        &self,
        status: DoiStatus,
        doi_type: Option<DoiType>,
        page: Option<Page>,
    ) -> Result<Vec<(Doi, DoiType)>>;

    /// Datasets whose primary DOI is `doi`, deleted ones included.
    async fn list_datasets_by_primary(&self, doi: &Doi) -> Result<Vec<Dataset>>;

    /// Datasets listing `doi` among their DOI alternate identifiers,
    /// deleted ones included.
    async fn list_datasets_by_alternate(&self, doi: &Doi) -> Result<Vec<Dataset>>;

    async fn get_download_by_doi(&self, doi: &Doi) -> Result<Option<Download>>;

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>>;
}
