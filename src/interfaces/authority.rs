//! Registration authority interface.

use async_trait::async_trait;

use crate::model::{AuthorityStatus, Doi};

/// Result type for authority operations.
pub type Result<T> = std::result::Result<T, AuthorityError>;

/// Errors from the registration authority.
///
/// None of these are fatal: callers downgrade them to "unknown".
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authority unavailable: {0}")]
    Unavailable(String),
}

/// How the authority resolves a DOI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: AuthorityStatus,
    pub target: Option<String>,
}

/// Read-only access to the external registration authority.
///
/// Each call is independent; a failure of one says nothing about the others.
///
/// Implementations:
/// - `DataCiteClient`: HTTP client to a DataCite MDS-style API
/// - `MockAuthority`: in-memory authority for tests
#[async_trait]
pub trait Authority: Send + Sync {
    async fn exists(&self, doi: &Doi) -> Result<bool>;

    async fn resolve(&self, doi: &Doi) -> Result<Resolution>;

    /// Metadata document currently registered, `None` when there is none.
    async fn get_metadata(&self, doi: &Doi) -> Result<Option<String>>;

    /// Authority name for logging.
    fn name(&self) -> &str;
}
