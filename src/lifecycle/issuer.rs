//! Issuer policy based on the registry's DOI prefix.

use crate::interfaces::IssuerPolicy;
use crate::model::Doi;

/// A DOI is issued locally when its prefix equals the registry prefix,
/// ignoring case.
#[derive(Debug, Clone)]
pub struct PrefixIssuer {
    prefix: String,
}

impl PrefixIssuer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl IssuerPolicy for PrefixIssuer {
    fn is_issued_locally(&self, doi: &Doi) -> bool {
        doi.prefix().eq_ignore_ascii_case(&self.prefix)
    }
}
