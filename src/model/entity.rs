//! Entities that own DOIs: datasets and occurrence downloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Doi;

vocabulary! {
    /// Type tag of a dataset alternate identifier.
    IdentifierKind {
        Doi => "DOI",
        Url => "URL",
        Lsid => "LSID",
        Uuid => "UUID",
        Other => "OTHER",
    }
}

vocabulary! {
    /// Lifecycle status of an occurrence download.
    DownloadStatus {
        Preparing => "PREPARING",
        Running => "RUNNING",
        Succeeded => "SUCCEEDED",
        Cancelled => "CANCELLED",
        Killed => "KILLED",
        Failed => "FAILED",
        Suspended => "SUSPENDED",
        FileErased => "FILE_ERASED",
    }
}

impl DownloadStatus {
    /// Whether the download finished successfully, even if its file was
    /// erased since.
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, DownloadStatus::Succeeded | DownloadStatus::FileErased)
    }
}

/// A secondary identifier attached to a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl AlternateIdentifier {
    pub fn doi(doi: &Doi) -> Self {
        Self {
            kind: IdentifierKind::Doi,
            value: doi.to_uri(),
        }
    }

    /// The DOI this identifier denotes, if it is DOI-tagged and parsable.
    pub fn as_doi(&self) -> Option<Doi> {
        if self.kind != IdentifierKind::Doi {
            return None;
        }
        Doi::parse(&self.value).ok()
    }
}

/// A dataset as far as DOI reconciliation is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub key: Uuid,
    pub title: String,
    /// Current primary DOI.
    pub doi: Option<Doi>,
    pub parent_key: Option<Uuid>,
    /// Soft-deletion timestamp.
    pub deleted: Option<DateTime<Utc>>,
    pub identifiers: Vec<AlternateIdentifier>,
}

impl Dataset {
    pub fn new(key: Uuid, title: impl Into<String>, doi: Option<Doi>) -> Self {
        Self {
            key,
            title: title.into(),
            doi,
            parent_key: None,
            deleted: None,
            identifiers: Vec::new(),
        }
    }

    pub fn with_alternate(mut self, identifier: AlternateIdentifier) -> Self {
        self.identifiers.push(identifier);
        self
    }

    pub fn with_deleted(mut self, deleted: DateTime<Utc>) -> Self {
        self.deleted = Some(deleted);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    /// Whether `doi` is listed among the DOI-tagged alternate identifiers.
    pub fn has_alternate_doi(&self, doi: &Doi) -> bool {
        self.identifiers
            .iter()
            .filter_map(AlternateIdentifier::as_doi)
            .any(|candidate| &candidate == doi)
    }
}

/// An occurrence download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub key: String,
    pub doi: Option<Doi>,
    pub status: DownloadStatus,
    /// User name of the account that requested the download.
    pub creator: String,
}

/// A registry user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: Option<String>,
}
