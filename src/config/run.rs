//! Run selection: which DOIs to process and what to do with them.

use std::path::PathBuf;

use serde::Deserialize;

use super::ConfigError;
use crate::model::DoiType;

/// What a run processes and which pipeline steps are enabled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// A single DOI to process.
    pub doi: Option<String>,
    /// File with one DOI per line.
    pub doi_list: Option<PathBuf>,
    /// Print the DOIs with status FAILED and exit.
    pub list_failed: bool,
    /// Process every DOI with status FAILED.
    pub failed_sweep: bool,
    /// Restrict `list_failed` and `failed_sweep` to one DOI type.
    pub failed_type: Option<DoiType>,
    /// Try to repair each DOI.
    pub fix: bool,
    /// Write the local metadata snapshot of each DOI to a file.
    pub export: bool,
    /// Directory receiving exported files.
    pub export_dir: PathBuf,
    /// Do not print the diagnostic report.
    pub skip_diagnostic: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            doi: None,
            doi_list: None,
            list_failed: false,
            failed_sweep: false,
            failed_type: None,
            fix: false,
            export: false,
            export_dir: PathBuf::from("."),
            skip_diagnostic: false,
        }
    }
}

/// The validated source of DOIs for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Single(String),
    List(PathBuf),
    FailedSweep(Option<DoiType>),
    ListFailed(Option<DoiType>),
}

impl RunConfig {
    fn single_doi(&self) -> Option<&str> {
        self.doi.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    fn list_path(&self) -> Option<&PathBuf> {
        self.doi_list
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Resolve the run mode, rejecting incompatible combinations.
    pub fn mode(&self) -> Result<RunMode, ConfigError> {
        let single = self.single_doi();
        let list = self.list_path();

        if self.list_failed
            && (single.is_some() || list.is_some() || self.export || self.fix || self.failed_sweep)
        {
            return Err(ConfigError::ListFailedNotAlone);
        }
        if single.is_some() && list.is_some() {
            return Err(ConfigError::DoiAndDoiList);
        }
        if self.export && list.is_some() {
            return Err(ConfigError::ExportWithDoiList);
        }
        if self.failed_sweep && (single.is_some() || list.is_some()) {
            return Err(ConfigError::SweepWithExplicitDois);
        }

        if self.list_failed {
            Ok(RunMode::ListFailed(self.failed_type))
        } else if let Some(doi) = single {
            Ok(RunMode::Single(doi.to_string()))
        } else if let Some(path) = list {
            Ok(RunMode::List(path.clone()))
        } else if self.failed_sweep {
            Ok(RunMode::FailedSweep(self.failed_type))
        } else {
            Err(ConfigError::NothingToDo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> RunConfig {
        RunConfig::default()
    }

    #[test]
    fn test_single_doi_mode() {
        let config = RunConfig {
            doi: Some(" 10.1/a ".to_string()),
            fix: true,
            export: true,
            ..run()
        };
        assert_eq!(config.mode().unwrap(), RunMode::Single("10.1/a".to_string()));
    }

    #[test]
    fn test_blank_doi_is_ignored() {
        let config = RunConfig {
            doi: Some("   ".to_string()),
            failed_sweep: true,
            ..run()
        };
        assert_eq!(config.mode().unwrap(), RunMode::FailedSweep(None));
    }

    #[test]
    fn test_doi_and_list_are_exclusive() {
        let config = RunConfig {
            doi: Some("10.1/a".to_string()),
            doi_list: Some(PathBuf::from("dois.txt")),
            ..run()
        };
        assert!(matches!(config.mode(), Err(ConfigError::DoiAndDoiList)));
    }

    #[test]
    fn test_export_rejected_with_list() {
        let config = RunConfig {
            doi_list: Some(PathBuf::from("dois.txt")),
            export: true,
            ..run()
        };
        assert!(matches!(config.mode(), Err(ConfigError::ExportWithDoiList)));
    }

    #[test]
    fn test_list_failed_must_be_alone() {
        let config = RunConfig {
            list_failed: true,
            fix: true,
            ..run()
        };
        assert!(matches!(config.mode(), Err(ConfigError::ListFailedNotAlone)));

        let config = RunConfig {
            list_failed: true,
            failed_type: Some(DoiType::Download),
            ..run()
        };
        assert_eq!(
            config.mode().unwrap(),
            RunMode::ListFailed(Some(DoiType::Download))
        );
    }

    #[test]
    fn test_sweep_rejects_explicit_dois() {
        let config = RunConfig {
            failed_sweep: true,
            doi: Some("10.1/a".to_string()),
            ..run()
        };
        assert!(matches!(config.mode(), Err(ConfigError::SweepWithExplicitDois)));
    }

    #[test]
    fn test_nothing_to_do() {
        assert!(matches!(run().mode(), Err(ConfigError::NothingToDo)));
    }
}
