//! Human-readable rendering of diagnostics and repair attempts.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::model::Doi;
use crate::services::{DiagnosticResult, EntityContext, RepairError, RepairOutcome};

/// Renders reports as aligned text lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticPrinter;

fn unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl DiagnosticPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_report(&self, result: &DiagnosticResult) -> String {
        let mut text = String::new();
        let mut line = |label: &str, value: &str| {
            let _ = writeln!(text, "  {:<24}{}", format!("{}:", label), value);
        };

        line("DOI", &result.doi.name());
        line("Type", result.doi_type.as_str());
        line("Local status", result.local_status.as_str());
        line("Local target", or_dash(result.local_target.as_deref()));
        line("Exists at authority", &unknown(result.exists_at_authority));
        line("Authority status", &unknown(result.authority_status));
        line("Authority target", or_dash(result.authority_target.as_deref()));
        line("Metadata equals", &unknown(result.metadata_equals));

        match &result.context {
            EntityContext::Dataset(context) => {
                if context.related.is_empty() {
                    line("Related datasets", "none");
                }
                for dataset in &context.related {
                    let deleted = if dataset.is_deleted() { " [deleted]" } else { "" };
                    let current = dataset
                        .doi
                        .as_ref()
                        .map_or_else(|| "no DOI".to_string(), Doi::name);
                    line(
                        "Related dataset",
                        &format!("{} {} ({}){}", dataset.key, dataset.title, current, deleted),
                    );
                }
                line(
                    "DOI in alternates",
                    &unknown(context.doi_in_alternate_identifiers),
                );
                if context.ambiguous {
                    text.push_str("  WARNING: ambiguous ownership, expected exactly one dataset\n");
                }
            }
            EntityContext::Download(download) => {
                line("Download", &download.key);
                line("Download status", download.status.as_str());
                line("Download creator", &download.creator);
            }
            EntityContext::Unsupported => {
                line("Entity", "not inspected for this DOI type");
            }
        }

        text
    }

    pub fn render_fix_attempt(
        &self,
        doi: &Doi,
        attempt: &Result<RepairOutcome, RepairError>,
    ) -> String {
        let status = match attempt {
            Ok(RepairOutcome::Fixed) => "success".to_string(),
            Ok(RepairOutcome::NotApplicable) => "failed (nothing to repair)".to_string(),
            Ok(RepairOutcome::Unsupported(reason)) => format!("failed ({})", reason),
            Ok(RepairOutcome::Ambiguous { owners }) => {
                format!("failed (DOI referenced by {} datasets)", owners.len())
            }
            Err(e) => format!("failed ({})", e),
        };
        format!("Attempt to fix DOI {}: {}", doi, status)
    }

    pub fn print_report<W: Write>(&self, out: &mut W, result: &DiagnosticResult) -> io::Result<()> {
        write!(out, "{}", self.render_report(result))
    }

    pub fn print_fix_attempt<W: Write>(
        &self,
        out: &mut W,
        doi: &Doi,
        attempt: &Result<RepairOutcome, RepairError>,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.render_fix_attempt(doi, attempt))
    }
}
