//! Export of the local metadata snapshot of a DOI.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::interfaces::{IdentifierStore, StoreError};
use crate::model::Doi;

/// Errors raised while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write the stored metadata of `doi` to `dir/<prefix>_<suffix>_export.xml`.
///
/// Returns the written path, or `None` when the DOI has no stored metadata.
pub async fn export_metadata(
    store: &dyn IdentifierStore,
    doi: &Doi,
    dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let metadata = match store.get_metadata(doi).await? {
        Some(metadata) if !metadata.is_empty() => metadata,
        _ => {
            debug!(doi = %doi, "No metadata to export");
            return Ok(None);
        }
    };

    let path = dir.join(doi.export_file_name());
    tokio::fs::write(&path, metadata.as_bytes())
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    debug!(doi = %doi, path = %path.display(), "Metadata exported");
    Ok(Some(path))
}
