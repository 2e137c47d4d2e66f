//! Batch driver: runs the per-DOI pipeline over a source of DOIs.
//!
//! DOIs are processed one at a time in input order. A malformed input, an
//! export failure or a failed repair is recorded against that DOI and the
//! batch moves on. A local store failure aborts the batch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::diagnostic::{DiagnosticEngine, DiagnosticResult};
use super::export::{export_metadata, ExportError};
use super::repair::{RepairEngine, RepairError, RepairOutcome};
use crate::config::RunConfig;
use crate::interfaces::{IdentifierStore, Page, StoreError};
use crate::model::{Doi, DoiStatus, DoiType};
use crate::report::DiagnosticPrinter;

/// Page size used when listing FAILED DOIs.
pub const FAILED_PAGE_SIZE: u64 = 400;

/// Result type for batch runs.
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Pipeline steps enabled for a run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub skip_diagnostic: bool,
    pub export: bool,
    pub fix: bool,
    pub export_dir: PathBuf,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            skip_diagnostic: false,
            export: false,
            fix: false,
            export_dir: PathBuf::from("."),
        }
    }
}

impl From<&RunConfig> for BatchOptions {
    fn from(run: &RunConfig) -> Self {
        Self {
            skip_diagnostic: run.skip_diagnostic,
            export: run.export,
            fix: run.fix,
            export_dir: run.export_dir.clone(),
        }
    }
}

/// What happened to one input.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierReport {
    pub input: String,
    /// `None` when the input is not a valid DOI.
    pub doi: Option<Doi>,
    pub diagnostic: Option<DiagnosticResult>,
    pub exported: Option<PathBuf>,
    pub repair: Option<RepairOutcome>,
    /// Parse, export and repair errors.
    pub errors: Vec<String>,
}

impl IdentifierReport {
    fn new(input: &str, doi: Doi) -> Self {
        Self {
            input: input.to_string(),
            doi: Some(doi),
            diagnostic: None,
            exported: None,
            repair: None,
            errors: Vec::new(),
        }
    }

    fn malformed(input: &str, error: String) -> Self {
        Self {
            input: input.to_string(),
            doi: None,
            diagnostic: None,
            exported: None,
            repair: None,
            errors: vec![error],
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.doi.is_none()
    }
}

/// Outcome of a batch run, one entry per input in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub identifiers: Vec<IdentifierReport>,
}

impl BatchReport {
    fn count_repairs(&self, f: impl Fn(&RepairOutcome) -> bool) -> usize {
        self.identifiers
            .iter()
            .filter(|r| r.repair.as_ref().is_some_and(&f))
            .count()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.count_repairs(RepairOutcome::is_fixed)
    }

    pub fn ambiguous(&self) -> usize {
        self.count_repairs(|o| matches!(o, RepairOutcome::Ambiguous { .. }))
    }

    pub fn unsupported(&self) -> usize {
        self.count_repairs(|o| matches!(o, RepairOutcome::Unsupported(_)))
    }

    pub fn not_applicable(&self) -> usize {
        self.count_repairs(|o| matches!(o, RepairOutcome::NotApplicable))
    }

    pub fn errors(&self) -> usize {
        self.identifiers
            .iter()
            .filter(|r| !r.is_malformed() && !r.errors.is_empty())
            .count()
    }

    pub fn malformed(&self) -> usize {
        self.identifiers.iter().filter(|r| r.is_malformed()).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {} DOI(s): {} fixed, {} ambiguous, {} unsupported, {} not applicable, {} with errors, {} malformed",
            self.len(),
            self.succeeded(),
            self.ambiguous(),
            self.unsupported(),
            self.not_applicable(),
            self.errors(),
            self.malformed()
        )
    }
}

/// Drives diagnosis, export and repair, writing text to `out`.
pub struct BatchDriver<W: Write> {
    store: Arc<dyn IdentifierStore>,
    diagnostic: DiagnosticEngine,
    repair: RepairEngine,
    printer: DiagnosticPrinter,
    options: BatchOptions,
    out: W,
}

impl<W: Write> BatchDriver<W> {
    pub fn new(
        store: Arc<dyn IdentifierStore>,
        diagnostic: DiagnosticEngine,
        repair: RepairEngine,
        options: BatchOptions,
        out: W,
    ) -> Self {
        Self {
            store,
            diagnostic,
            repair,
            printer: DiagnosticPrinter::new(),
            options,
            out,
        }
    }

    /// Consume the driver and return the text sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Process a single DOI given as text.
    ///
    /// A malformed input is reported and nothing else happens.
    pub async fn run_single(&mut self, input: &str) -> Result<BatchReport> {
        let report = match Doi::parse(input) {
            Ok(doi) => self.process(input, doi).await?,
            Err(e) => {
                writeln!(self.out, "{} is not a valid DOI", input)?;
                IdentifierReport::malformed(input, e.to_string())
            }
        };
        Ok(BatchReport {
            identifiers: vec![report],
        })
    }

    /// Process every DOI listed in a file, one per line.
    ///
    /// Blank lines are ignored. Malformed lines are logged, recorded and
    /// skipped.
    pub async fn run_list_file(&mut self, path: &Path) -> Result<BatchReport> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to read DOI list");
                writeln!(self.out, "DOI list can not be found: {}", path.display())?;
                return Ok(BatchReport::default());
            }
        };

        let mut report = BatchReport::default();
        for (index, line) in content.lines().enumerate() {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            match Doi::parse(input) {
                Ok(doi) => report.identifiers.push(self.process(input, doi).await?),
                Err(e) => {
                    warn!(line = index + 1, input = %input, error = %e, "Skipping invalid DOI");
                    report
                        .identifiers
                        .push(IdentifierReport::malformed(input, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Process an explicit list of DOIs given as text.
    pub async fn run_inputs(&mut self, inputs: &[String]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for input in inputs {
            match Doi::parse(input) {
                Ok(doi) => report.identifiers.push(self.process(input, doi).await?),
                Err(e) => {
                    writeln!(self.out, "{} is not a valid DOI", input)?;
                    report
                        .identifiers
                        .push(IdentifierReport::malformed(input, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Process every DOI whose local status is FAILED.
    pub async fn run_failed_sweep(&mut self, doi_type: Option<DoiType>) -> Result<BatchReport> {
        let failed = self.failed_dois(doi_type).await?;
        info!(count = failed.len(), "Processing FAILED DOIs");

        let mut report = BatchReport::default();
        for (doi, _) in failed {
            let input = doi.name();
            report.identifiers.push(self.process(&input, doi).await?);
        }
        Ok(report)
    }

    /// Print every FAILED DOI as `<doi> (<TYPE>)`. Returns how many.
    pub async fn list_failed(&mut self, doi_type: Option<DoiType>) -> Result<usize> {
        let failed = self.failed_dois(doi_type).await?;
        for (doi, doi_type) in &failed {
            writeln!(self.out, "{} ({})", doi, doi_type)?;
        }
        Ok(failed.len())
    }

    /// All FAILED DOIs, read page by page before any processing starts.
    async fn failed_dois(&self, doi_type: Option<DoiType>) -> Result<Vec<(Doi, DoiType)>> {
        let mut all = Vec::new();
        let mut page = Page::first(FAILED_PAGE_SIZE);
        loop {
            let batch = self
                .store
                .list_by_status(DoiStatus::Failed, doi_type, Some(page))
                .await?;
            let fetched = batch.len() as u64;
            all.extend(batch);
            if fetched < page.limit {
                break;
            }
            page = page.next();
        }
        Ok(all)
    }

    async fn process(&mut self, input: &str, doi: Doi) -> Result<IdentifierReport> {
        debug!(doi = %doi, "Processing DOI");
        let mut report = IdentifierReport::new(input, doi.clone());

        if !self.options.skip_diagnostic {
            match self.diagnostic.diagnose(&doi).await? {
                Some(result) => {
                    self.printer.print_report(&mut self.out, &result)?;
                    report.diagnostic = Some(result);
                }
                None => writeln!(
                    self.out,
                    "No report can be generated. Nothing found for DOI {}",
                    doi
                )?,
            }
        }

        if self.options.export {
            match export_metadata(self.store.as_ref(), &doi, &self.options.export_dir).await {
                Ok(Some(path)) => {
                    writeln!(self.out, "Exported file saved in {}", path.display())?;
                    report.exported = Some(path);
                }
                Ok(None) => {}
                Err(ExportError::Store(e)) => return Err(e.into()),
                Err(e) => {
                    warn!(doi = %doi, error = %e, "Export failed");
                    report.errors.push(e.to_string());
                }
            }
        }

        if self.options.fix {
            let attempt = match self.repair.repair(&doi).await {
                Err(RepairError::Store(e)) => return Err(e.into()),
                attempt => attempt,
            };
            self.printer.print_fix_attempt(&mut self.out, &doi, &attempt)?;
            match attempt {
                Ok(outcome) => report.repair = Some(outcome),
                Err(e) => {
                    warn!(doi = %doi, error = %e, "Repair failed");
                    report.errors.push(e.to_string());
                }
            }
        }

        Ok(report)
    }
}
