//! Lifecycle handler and issuer policy interfaces.
//!
//! The lifecycle handler performs the side effects of "a DOI changed"
//! (metadata re-registration, index updates, notifications). The repair
//! engine only decides *whether* to replay it.

use async_trait::async_trait;

use crate::model::{Dataset, Doi, Download, User};

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors raised while applying a lifecycle change.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lifecycle handler rejected change: {0}")]
    Rejected(String),

    #[error("Lifecycle handler unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Sink for entity DOI changes.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// A dataset's DOI state changed. `previous` is the DOI it had before,
    /// `None` when the current DOI is being reasserted.
    async fn dataset_changed(&self, dataset: &Dataset, previous: Option<&Doi>) -> Result<()>;

    /// A download changed. `previous` is the download before the change,
    /// `None` when its state is being reasserted.
    async fn download_changed(
        &self,
        download: &Download,
        previous: Option<&Download>,
        user: &User,
    ) -> Result<()>;

    /// Handler name for logging.
    fn name(&self) -> &str;
}

/// Decides whether a DOI was issued by this registry.
pub trait IssuerPolicy: Send + Sync {
    fn is_issued_locally(&self, doi: &Doi) -> bool;
}
