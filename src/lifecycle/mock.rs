//! Recording lifecycle handler for tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LifecycleEvent;
use crate::interfaces::lifecycle::{LifecycleError, LifecycleHandler, Result};
use crate::model::{Dataset, Doi, Download, User};

/// Handler that records every change it is asked to apply.
#[derive(Default)]
pub struct RecordingLifecycleHandler {
    events: RwLock<Vec<LifecycleEvent>>,
    fail: RwLock<bool>,
}

impl RecordingLifecycleHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent change. Rejected changes are not recorded.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    pub async fn events(&self) -> Vec<LifecycleEvent> {
        self.events.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.events.read().await.len()
    }

    async fn record(&self, event: LifecycleEvent) -> Result<()> {
        if *self.fail.read().await {
            return Err(LifecycleError::Rejected(
                "recording handler switched to fail".to_string(),
            ));
        }
        self.events.write().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl LifecycleHandler for RecordingLifecycleHandler {
    async fn dataset_changed(&self, dataset: &Dataset, previous: Option<&Doi>) -> Result<()> {
        self.record(LifecycleEvent::dataset(dataset, previous)).await
    }

    async fn download_changed(
        &self,
        download: &Download,
        previous: Option<&Download>,
        user: &User,
    ) -> Result<()> {
        self.record(LifecycleEvent::download(download, previous, user))
            .await
    }

    fn name(&self) -> &str {
        "recording"
    }
}
