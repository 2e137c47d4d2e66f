//! DOI value type and the local/authority status vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resolver and scheme prefixes accepted in front of a DOI name.
const DOI_PREFIXES: [&str; 5] = [
    "doi:",
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

/// Errors produced when parsing a DOI string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DoiParseError {
    #[error("DOI is empty")]
    Empty,

    #[error("DOI '{0}' has no '/' separating prefix and suffix")]
    MissingSeparator(String),

    #[error("DOI prefix '{0}' must begin with '10.'")]
    InvalidPrefix(String),

    #[error("DOI '{0}' has an empty suffix")]
    EmptySuffix(String),
}

/// A persistent identifier made of a prefix (`10.xxxx`) and a suffix.
///
/// Both parts are stored lower-cased; DOIs are case-insensitive at the
/// registration authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Doi {
    prefix: String,
    suffix: String,
}

impl Doi {
    /// Build a DOI from its two parts.
    pub fn new(prefix: &str, suffix: &str) -> Result<Self, DoiParseError> {
        let prefix = prefix.trim().to_lowercase();
        let suffix = suffix.trim().to_lowercase();

        if !prefix.starts_with("10.") || prefix.len() == 3 {
            return Err(DoiParseError::InvalidPrefix(prefix));
        }
        if suffix.is_empty() {
            return Err(DoiParseError::EmptySuffix(format!("{}/", prefix)));
        }
        Ok(Self { prefix, suffix })
    }

    /// Parse a DOI in bare (`10.1234/abc`), `doi:` or resolver URL form.
    pub fn parse(input: &str) -> Result<Self, DoiParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DoiParseError::Empty);
        }

        let lowered = trimmed.to_lowercase();
        let name = DOI_PREFIXES
            .iter()
            .find_map(|p| lowered.strip_prefix(p))
            .unwrap_or(&lowered);

        let (prefix, suffix) = name
            .split_once('/')
            .ok_or_else(|| DoiParseError::MissingSeparator(trimmed.to_string()))?;

        Self::new(prefix, suffix)
    }

    /// Quick check used before constructing a DOI from user input.
    pub fn is_parsable(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The `prefix/suffix` form.
    pub fn name(&self) -> String {
        format!("{}/{}", self.prefix, self.suffix)
    }

    /// The `doi:prefix/suffix` form.
    pub fn to_uri(&self) -> String {
        format!("doi:{}", self.name())
    }

    /// File name used when exporting the local metadata snapshot.
    pub fn export_file_name(&self) -> String {
        format!("{}_export.xml", self.name().replace('/', "_"))
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.suffix)
    }
}

impl FromStr for Doi {
    type Err = DoiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Doi {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Doi {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Doi::parse(&raw).map_err(serde::de::Error::custom)
    }
}

vocabulary! {
    /// Kind of entity a DOI was minted for. Fixed at creation time.
    DoiType {
        Dataset => "DATASET",
        Download => "DOWNLOAD",
        DataPackage => "DATA_PACKAGE",
        DerivedDataset => "DERIVED_DATASET",
    }
}

vocabulary! {
    /// Status of a DOI in the local record store.
    DoiStatus {
        New => "NEW",
        Reserved => "RESERVED",
        Registered => "REGISTERED",
        Failed => "FAILED",
        Deleted => "DELETED",
    }
}

vocabulary! {
    /// Status of a DOI as reported by the registration authority.
    AuthorityStatus {
        Registered => "REGISTERED",
        Draft => "DRAFT",
        Unknown => "UNKNOWN",
    }
}

/// A DOI row of the local record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoiRecord {
    pub doi: Doi,
    pub doi_type: DoiType,
    pub status: DoiStatus,
    pub target: Option<String>,
}
