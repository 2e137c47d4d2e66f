//! In-memory registration authority for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::authority::{Authority, AuthorityError, Resolution, Result};
use crate::model::{AuthorityStatus, Doi};

#[derive(Debug, Clone)]
struct Entry {
    status: AuthorityStatus,
    target: Option<String>,
    metadata: Option<String>,
}

#[derive(Default)]
struct Failures {
    exists: bool,
    resolve: bool,
    metadata: bool,
}

/// Mock authority keeping registrations in memory.
///
/// Unknown DOIs do not exist, resolve to `UNKNOWN` and carry no metadata.
/// Each call kind can be switched to fail independently.
#[derive(Default)]
pub struct MockAuthority {
    entries: RwLock<HashMap<Doi, Entry>>,
    failures: RwLock<Failures>,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DOI pointing at `target`.
    pub async fn register(&self, doi: &Doi, target: &str, metadata: Option<&str>) {
        self.insert(
            doi,
            Entry {
                status: AuthorityStatus::Registered,
                target: Some(target.to_string()),
                metadata: metadata.map(str::to_string),
            },
        )
        .await;
    }

    /// Reserve a DOI as a draft.
    pub async fn draft(&self, doi: &Doi, metadata: Option<&str>) {
        self.insert(
            doi,
            Entry {
                status: AuthorityStatus::Draft,
                target: None,
                metadata: metadata.map(str::to_string),
            },
        )
        .await;
    }

    async fn insert(&self, doi: &Doi, entry: Entry) {
        self.entries.write().await.insert(doi.clone(), entry);
    }

    pub async fn set_fail_exists(&self, fail: bool) {
        self.failures.write().await.exists = fail;
    }

    pub async fn set_fail_resolve(&self, fail: bool) {
        self.failures.write().await.resolve = fail;
    }

    pub async fn set_fail_metadata(&self, fail: bool) {
        self.failures.write().await.metadata = fail;
    }

    /// Make every call fail.
    pub async fn set_unavailable(&self, fail: bool) {
        let mut failures = self.failures.write().await;
        failures.exists = fail;
        failures.resolve = fail;
        failures.metadata = fail;
    }

    fn unavailable(call: &str) -> AuthorityError {
        AuthorityError::Unavailable(format!("mock authority {} switched off", call))
    }
}

#[async_trait]
impl Authority for MockAuthority {
    async fn exists(&self, doi: &Doi) -> Result<bool> {
        if self.failures.read().await.exists {
            return Err(Self::unavailable("exists"));
        }
        Ok(self.entries.read().await.contains_key(doi))
    }

    async fn resolve(&self, doi: &Doi) -> Result<Resolution> {
        if self.failures.read().await.resolve {
            return Err(Self::unavailable("resolve"));
        }
        Ok(match self.entries.read().await.get(doi) {
            Some(entry) => Resolution {
                status: entry.status,
                target: entry.target.clone(),
            },
            None => Resolution {
                status: AuthorityStatus::Unknown,
                target: None,
            },
        })
    }

    async fn get_metadata(&self, doi: &Doi) -> Result<Option<String>> {
        if self.failures.read().await.metadata {
            return Err(Self::unavailable("metadata"));
        }
        Ok(self
            .entries
            .read()
            .await
            .get(doi)
            .and_then(|entry| entry.metadata.clone()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
