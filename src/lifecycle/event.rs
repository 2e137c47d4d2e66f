//! Change events handed to lifecycle handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Dataset, Doi, Download, DownloadStatus, User};

/// A DOI change of an owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    DatasetChanged {
        dataset_key: Uuid,
        doi: Option<Doi>,
        /// `None` when the current DOI is reasserted.
        previous_doi: Option<Doi>,
    },
    DownloadChanged {
        download_key: String,
        doi: Option<Doi>,
        status: DownloadStatus,
        previous_doi: Option<Doi>,
        user: String,
    },
}

impl LifecycleEvent {
    pub fn dataset(dataset: &Dataset, previous: Option<&Doi>) -> Self {
        LifecycleEvent::DatasetChanged {
            dataset_key: dataset.key,
            doi: dataset.doi.clone(),
            previous_doi: previous.cloned(),
        }
    }

    pub fn download(download: &Download, previous: Option<&Download>, user: &User) -> Self {
        LifecycleEvent::DownloadChanged {
            download_key: download.key.clone(),
            doi: download.doi.clone(),
            status: download.status,
            previous_doi: previous.and_then(|p| p.doi.clone()),
            user: user.name.clone(),
        }
    }

    /// The DOI the entity carries after the change.
    pub fn doi(&self) -> Option<&Doi> {
        match self {
            LifecycleEvent::DatasetChanged { doi, .. }
            | LifecycleEvent::DownloadChanged { doi, .. } => doi.as_ref(),
        }
    }

    pub fn previous_doi(&self) -> Option<&Doi> {
        match self {
            LifecycleEvent::DatasetChanged { previous_doi, .. }
            | LifecycleEvent::DownloadChanged { previous_doi, .. } => previous_doi.as_ref(),
        }
    }
}
