//! doisync - DOI reconciliation and repair
//!
//! Compares the DOIs recorded in a registry's local store with the
//! external registration authority, reports divergences and replays the
//! DOI lifecycle change of an owning dataset or download when doing so is
//! known to be safe.

pub mod authority;
pub mod config;
pub mod interfaces;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
