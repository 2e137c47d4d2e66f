//! Reconciliation services.
//!
//! - `diagnostic`: compares one DOI between the local store and the authority
//! - `repair`: replays DOI lifecycle changes when that is known to be safe
//! - `export`: writes the local metadata snapshot of a DOI to disk
//! - `batch`: runs the per-DOI pipeline over a DOI source

pub mod batch;
pub mod diagnostic;
pub mod export;
pub mod ownership;
pub mod repair;

pub use batch::{BatchDriver, BatchError, BatchOptions, BatchReport, IdentifierReport};
pub use diagnostic::{DatasetContext, DiagnosticEngine, DiagnosticResult, EntityContext};
pub use export::{export_metadata, ExportError};
pub use repair::{RepairEngine, RepairError, RepairOutcome, UnsupportedReason};
