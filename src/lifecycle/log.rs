//! Lifecycle handler that only logs the changes it receives.

use async_trait::async_trait;
use tracing::info;

use crate::interfaces::lifecycle::{LifecycleHandler, Result};
use crate::model::{Dataset, Doi, Download, User};

/// Dry-run handler: every change is logged and accepted.
#[derive(Debug, Default)]
pub struct LogLifecycleHandler;

impl LogLifecycleHandler {
    pub fn new() -> Self {
        Self
    }
}

fn doi_text(doi: Option<&Doi>) -> String {
    doi.map(Doi::name).unwrap_or_else(|| "-".to_string())
}

#[async_trait]
impl LifecycleHandler for LogLifecycleHandler {
    async fn dataset_changed(&self, dataset: &Dataset, previous: Option<&Doi>) -> Result<()> {
        info!(
            dataset_key = %dataset.key,
            doi = %doi_text(dataset.doi.as_ref()),
            previous_doi = %doi_text(previous),
            "Dataset DOI changed"
        );
        Ok(())
    }

    async fn download_changed(
        &self,
        download: &Download,
        previous: Option<&Download>,
        user: &User,
    ) -> Result<()> {
        info!(
            download_key = %download.key,
            doi = %doi_text(download.doi.as_ref()),
            previous_doi = %doi_text(previous.and_then(|p| p.doi.as_ref())),
            status = %download.status,
            user = %user.name,
            "Download DOI changed"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DownloadStatus;
    use uuid::Uuid;

    fn doi(s: &str) -> Doi {
        Doi::parse(s).unwrap()
    }

    #[test]
    fn test_doi_text() {
        assert_eq!(doi_text(Some(&doi("doi:10.15468/ABC"))), "10.15468/abc");
        assert_eq!(doi_text(None), "-");
    }

    #[tokio::test]
    async fn test_dataset_change_is_accepted() {
        let handler = LogLifecycleHandler::new();
        let dataset = Dataset::new(Uuid::new_v4(), "Birds", Some(doi("10.15468/new")));

        handler
            .dataset_changed(&dataset, Some(&doi("10.15468/old")))
            .await
            .unwrap();
        handler.dataset_changed(&dataset, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_download_change_is_accepted() {
        let handler = LogLifecycleHandler::new();
        let download = Download {
            key: "0000001-200101000000000".to_string(),
            doi: Some(doi("10.15468/dl.abc")),
            status: DownloadStatus::Succeeded,
            creator: "alice".to_string(),
        };
        let user = User {
            name: "alice".to_string(),
            email: None,
        };

        handler
            .download_changed(&download, Some(&download), &user)
            .await
            .unwrap();
        handler.download_changed(&download, None, &user).await.unwrap();
        assert_eq!(handler.name(), "log");
    }
}
