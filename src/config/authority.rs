//! Registration authority and issuer configuration.

use std::time::Duration;

use serde::Deserialize;

/// Registration authority (DataCite MDS) client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Base URL of the MDS API.
    pub api: String,
    /// Account used for basic authentication.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for timeouts, connection errors, 429 and 5xx.
    pub max_retries: usize,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            api: "https://mds.datacite.org".to_string(),
            username: None,
            password: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl AuthorityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// DOI issuing configuration of this registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DoiConfig {
    /// Prefix of the DOIs this registry mints.
    pub prefix: String,
}

impl Default for DoiConfig {
    fn default() -> Self {
        Self {
            prefix: "10.15468".to_string(),
        }
    }
}
