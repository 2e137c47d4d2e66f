//! Replays the lifecycle change of a DOI when that is known to be safe.
//!
//! Only two situations are repaired:
//! - the DOI is the current DOI of its single owner (reassertion), or
//! - a dataset moved from the DOI to an externally issued one and its
//!   alternate identifiers record exactly that move.
//!
//! Everything else is reported and left alone.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::ownership::{active, related_datasets};
use crate::interfaces::{
    IdentifierStore, IssuerPolicy, LifecycleError, LifecycleHandler, StoreError,
};
use crate::model::{Dataset, Doi, DoiType, DownloadStatus};

/// Result type for repair operations.
pub type Result<T> = std::result::Result<T, RepairError>;

/// Errors that abort a single repair.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Why a repair was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    ChangedToLocallyIssued,
    AlternateIdentifiersUnexpected,
    NoCurrentDoi,
    DownloadNotTerminal(DownloadStatus),
    CreatorNotFound(String),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::ChangedToLocallyIssued => {
                write!(f, "DOI changed to a locally-issued DOI")
            }
            UnsupportedReason::AlternateIdentifiersUnexpected => {
                write!(f, "alternate identifiers not in the expected known-safe state")
            }
            UnsupportedReason::NoCurrentDoi => write!(f, "dataset has no current DOI"),
            UnsupportedReason::DownloadNotTerminal(status) => {
                write!(f, "download not in a terminal success state ({})", status)
            }
            UnsupportedReason::CreatorNotFound(name) => {
                write!(f, "creator account not found ({})", name)
            }
        }
    }
}

/// Result of a repair attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The lifecycle change was replayed.
    Fixed,
    /// Nothing to repair: unknown DOI, no owner, or a type without policy.
    NotApplicable,
    Unsupported(UnsupportedReason),
    /// More than one non-deleted dataset references the DOI.
    Ambiguous { owners: Vec<Uuid> },
}

impl RepairOutcome {
    pub fn is_fixed(&self) -> bool {
        matches!(self, RepairOutcome::Fixed)
    }
}

/// Repair policy selected by DOI type.
enum Owner {
    Dataset,
    Download,
    Unsupported,
}

impl From<DoiType> for Owner {
    fn from(doi_type: DoiType) -> Self {
        match doi_type {
            DoiType::Dataset => Owner::Dataset,
            DoiType::Download => Owner::Download,
            DoiType::DataPackage | DoiType::DerivedDataset => Owner::Unsupported,
        }
    }
}

/// Applies the repair policies.
pub struct RepairEngine {
    store: Arc<dyn IdentifierStore>,
    issuer: Arc<dyn IssuerPolicy>,
    lifecycle: Arc<dyn LifecycleHandler>,
}

impl RepairEngine {
    pub fn new(
        store: Arc<dyn IdentifierStore>,
        issuer: Arc<dyn IssuerPolicy>,
        lifecycle: Arc<dyn LifecycleHandler>,
    ) -> Self {
        Self {
            store,
            issuer,
            lifecycle,
        }
    }

    /// Attempt to repair a DOI.
    pub async fn repair(&self, doi: &Doi) -> Result<RepairOutcome> {
        let Some(doi_type) = self.store.get_type(doi).await? else {
            debug!(doi = %doi, "DOI unknown to the local store, nothing to repair");
            return Ok(RepairOutcome::NotApplicable);
        };

        match Owner::from(doi_type) {
            Owner::Dataset => self.reapply_dataset_doi(doi).await,
            Owner::Download => self.reapply_download_doi(doi).await,
            Owner::Unsupported => {
                debug!(doi = %doi, doi_type = %doi_type, "No repair policy for DOI type");
                Ok(RepairOutcome::NotApplicable)
            }
        }
    }

    async fn reapply_dataset_doi(&self, doi: &Doi) -> Result<RepairOutcome> {
        let related = related_datasets(self.store.as_ref(), doi).await?;
        let owners = active(&related);

        let dataset = match owners.as_slice() {
            [] => {
                debug!(doi = %doi, "No dataset references DOI");
                return Ok(RepairOutcome::NotApplicable);
            }
            [dataset] => *dataset,
            _ => {
                let keys: Vec<Uuid> = owners.iter().map(|d| d.key).collect();
                warn!(doi = %doi, owners = keys.len(), "DOI referenced by more than one dataset");
                return Ok(RepairOutcome::Ambiguous { owners: keys });
            }
        };

        if dataset.doi.as_ref() == Some(doi) {
            self.lifecycle.dataset_changed(dataset, None).await?;
            info!(doi = %doi, dataset_key = %dataset.key, "Dataset DOI reasserted");
            return Ok(RepairOutcome::Fixed);
        }

        self.reapply_changed_dataset_doi(doi, dataset).await
    }

    /// The dataset moved away from `doi` to its current DOI.
    async fn reapply_changed_dataset_doi(
        &self,
        doi: &Doi,
        dataset: &Dataset,
    ) -> Result<RepairOutcome> {
        let Some(current) = dataset.doi.as_ref() else {
            error!(doi = %doi, dataset_key = %dataset.key, "Dataset has no current DOI");
            return Ok(RepairOutcome::Unsupported(UnsupportedReason::NoCurrentDoi));
        };

        if self.issuer.is_issued_locally(current) {
            error!(
                doi = %doi,
                current_doi = %current,
                "Can not handle cases where the DOI changed to a locally-issued DOI"
            );
            return Ok(RepairOutcome::Unsupported(
                UnsupportedReason::ChangedToLocallyIssued,
            ));
        }

        if dataset.has_alternate_doi(doi) && !dataset.has_alternate_doi(current) {
            self.lifecycle.dataset_changed(dataset, Some(doi)).await?;
            info!(doi = %doi, current_doi = %current, dataset_key = %dataset.key, "Dataset DOI change replayed");
            return Ok(RepairOutcome::Fixed);
        }

        error!(
            doi = %doi,
            current_doi = %current,
            "Can not handle cases where the DOI changed but the alternate identifiers were not updated"
        );
        Ok(RepairOutcome::Unsupported(
            UnsupportedReason::AlternateIdentifiersUnexpected,
        ))
    }

    async fn reapply_download_doi(&self, doi: &Doi) -> Result<RepairOutcome> {
        let Some(download) = self.store.get_download_by_doi(doi).await? else {
            debug!(doi = %doi, "No download found for DOI");
            return Ok(RepairOutcome::NotApplicable);
        };

        if !download.status.is_terminal_success() {
            warn!(doi = %doi, status = %download.status, "Download not in a terminal success state");
            return Ok(RepairOutcome::Unsupported(
                UnsupportedReason::DownloadNotTerminal(download.status),
            ));
        }

        let Some(user) = self.store.get_user_by_name(&download.creator).await? else {
            warn!(doi = %doi, creator = %download.creator, "Download creator not found");
            return Ok(RepairOutcome::Unsupported(
                UnsupportedReason::CreatorNotFound(download.creator),
            ));
        };

        self.lifecycle
            .download_changed(&download, None, &user)
            .await?;
        info!(doi = %doi, download_key = %download.key, "Download DOI reasserted");
        Ok(RepairOutcome::Fixed)
    }
}

#[cfg(test)]
mod tests;
