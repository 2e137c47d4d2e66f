//! Owning-entity lookups shared by diagnosis and repair.

use std::collections::HashSet;

use crate::interfaces::identifier_store::{IdentifierStore, Result};
use crate::model::{Dataset, Doi};

/// Datasets referencing `doi` as primary DOI or as an alternate identifier.
///
/// Primary matches come first; a dataset found by both lookups appears once.
/// Deleted datasets are included.
pub async fn related_datasets(store: &dyn IdentifierStore, doi: &Doi) -> Result<Vec<Dataset>> {
    let mut related = store.list_datasets_by_primary(doi).await?;
    let alternates = store.list_datasets_by_alternate(doi).await?;

    let mut seen: HashSet<_> = related.iter().map(|d| d.key).collect();
    related.extend(alternates.into_iter().filter(|d| seen.insert(d.key)));
    Ok(related)
}

/// The non-deleted members of `datasets`.
pub fn active(datasets: &[Dataset]) -> Vec<&Dataset> {
    datasets.iter().filter(|d| !d.is_deleted()).collect()
}
