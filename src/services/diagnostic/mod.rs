//! Reconciliation of one DOI between the local store and the authority.
//!
//! Local store errors are returned to the caller. Authority errors are
//! logged and leave the corresponding fields unknown (`None`).

use std::sync::Arc;

use tracing::{debug, warn};

use super::ownership::{active, related_datasets};
use crate::interfaces::identifier_store::Result;
use crate::interfaces::{Authority, IdentifierStore};
use crate::model::{AuthorityStatus, Dataset, Doi, DoiStatus, DoiType, Download};

/// Dataset-specific findings.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetContext {
    /// Datasets referencing the DOI, deleted ones included.
    pub related: Vec<Dataset>,
    /// Not exactly one non-deleted dataset references the DOI.
    pub ambiguous: bool,
    /// Whether the single non-deleted owner lists the DOI among its
    /// alternate identifiers. `None` when ownership is ambiguous.
    pub doi_in_alternate_identifiers: Option<bool>,
}

/// What the DOI belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityContext {
    Dataset(DatasetContext),
    Download(Download),
    /// DOI type without entity lookups.
    Unsupported,
}

/// State of one DOI on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticResult {
    pub doi: Doi,
    pub doi_type: DoiType,
    pub local_status: DoiStatus,
    pub local_target: Option<String>,
    pub exists_at_authority: Option<bool>,
    /// Exact comparison of the local and registered metadata documents.
    pub metadata_equals: Option<bool>,
    pub authority_status: Option<AuthorityStatus>,
    pub authority_target: Option<String>,
    pub context: EntityContext,
}

/// Builds a `DiagnosticResult` per DOI.
pub struct DiagnosticEngine {
    store: Arc<dyn IdentifierStore>,
    authority: Arc<dyn Authority>,
}

impl DiagnosticEngine {
    pub fn new(store: Arc<dyn IdentifierStore>, authority: Arc<dyn Authority>) -> Self {
        Self { store, authority }
    }

    /// Diagnose a DOI.
    ///
    /// Returns `None` when the DOI is unknown locally, or when it is a
    /// download DOI without a download record.
    pub async fn diagnose(&self, doi: &Doi) -> Result<Option<DiagnosticResult>> {
        let Some(record) = self.store.get(doi).await? else {
            debug!(doi = %doi, "DOI unknown to the local store");
            return Ok(None);
        };

        let context = match record.doi_type {
            DoiType::Dataset => EntityContext::Dataset(self.dataset_context(doi).await?),
            DoiType::Download => match self.store.get_download_by_doi(doi).await? {
                Some(download) => EntityContext::Download(download),
                None => {
                    debug!(doi = %doi, "No download found for DOI");
                    return Ok(None);
                }
            },
            DoiType::DataPackage | DoiType::DerivedDataset => EntityContext::Unsupported,
        };

        let mut result = DiagnosticResult {
            doi: doi.clone(),
            doi_type: record.doi_type,
            local_status: record.status,
            local_target: record.target,
            exists_at_authority: None,
            metadata_equals: None,
            authority_status: None,
            authority_target: None,
            context,
        };

        result.exists_at_authority = match self.authority.exists(doi).await {
            Ok(exists) => Some(exists),
            Err(e) => {
                warn!(doi = %doi, authority = self.authority.name(), error = %e, "Authority existence check failed");
                None
            }
        };

        if result.exists_at_authority == Some(true) {
            let local = self.store.get_metadata(doi).await?;
            result.metadata_equals = match self.authority.get_metadata(doi).await {
                Ok(remote) => Some(local == remote),
                Err(e) => {
                    warn!(doi = %doi, authority = self.authority.name(), error = %e, "Authority metadata lookup failed");
                    None
                }
            };

            match self.authority.resolve(doi).await {
                Ok(resolution) => {
                    result.authority_status = Some(resolution.status);
                    result.authority_target = resolution.target;
                }
                Err(e) => {
                    warn!(doi = %doi, authority = self.authority.name(), error = %e, "Authority resolution failed");
                }
            }
        }

        Ok(Some(result))
    }

    async fn dataset_context(&self, doi: &Doi) -> Result<DatasetContext> {
        let related = related_datasets(self.store.as_ref(), doi).await?;
        let owners = active(&related);

        let doi_in_alternate_identifiers = match owners.as_slice() {
            [owner] => Some(owner.has_alternate_doi(doi)),
            _ => None,
        };
        let ambiguous = owners.len() != 1;

        Ok(DatasetContext {
            related,
            ambiguous,
            doi_in_alternate_identifiers,
        })
    }
}
