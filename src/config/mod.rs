//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod authority;
mod lifecycle;
mod run;
mod storage;

pub use authority::{AuthorityConfig, DoiConfig};
pub use lifecycle::{LifecycleConfig, LifecycleType, WebhookConfig};
pub use run::{RunConfig, RunMode};
pub use storage::{SqliteConfig, StorageType, StoreConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "DOISYNC_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DOISYNC";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "DOISYNC_LOG";

use serde::Deserialize;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("list_failed must be used alone")]
    ListFailedNotAlone,

    #[error("doi and doi_list can not be used at the same time")]
    DoiAndDoiList,

    #[error("export can not be used with doi_list")]
    ExportWithDoiList,

    #[error("failed_sweep can not be combined with doi or doi_list")]
    SweepWithExplicitDois,

    #[error("Nothing to do: set one of doi, doi_list, failed_sweep or list_failed")]
    NothingToDo,

    #[error("DOI prefix '{0}' must begin with '10.'")]
    InvalidPrefix(String),

    #[error("Webhook lifecycle handler requires lifecycle.webhook.endpoint")]
    MissingWebhookEndpoint,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local record store.
    pub store: StoreConfig,
    /// Registration authority client.
    pub authority: AuthorityConfig,
    /// DOI issuing settings of this registry.
    pub doi: DoiConfig,
    /// Lifecycle handler invoked by repairs.
    pub lifecycle: LifecycleConfig,
    /// Run selection.
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        Ok(config)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check cross-field rules and resolve the run mode.
    pub fn validate(&self) -> Result<RunMode, ConfigError> {
        if !self.doi.prefix.starts_with("10.") {
            return Err(ConfigError::InvalidPrefix(self.doi.prefix.clone()));
        }
        if self.lifecycle.handler_type == LifecycleType::Webhook
            && self.lifecycle.webhook.endpoint.is_empty()
        {
            return Err(ConfigError::MissingWebhookEndpoint);
        }
        self.run.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DoiType;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.store.storage_type, StorageType::Sqlite);
        assert_eq!(config.store.sqlite.path, "./data/registry.db");
        assert_eq!(config.authority.timeout_secs, 30);
        assert_eq!(config.doi.prefix, "10.15468");
        assert_eq!(config.lifecycle.handler_type, LifecycleType::Log);
        assert!(!config.run.fix);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
store:
  type: sqlite
  sqlite:
    path: /tmp/registry.db

authority:
  api: https://mds.test.datacite.org
  username: GBIF.GBIF
  timeout_secs: 5

doi:
  prefix: "10.21373"

lifecycle:
  type: webhook
  webhook:
    endpoint: http://localhost:9000/doi-changes

run:
  failed_sweep: true
  failed_type: DOWNLOAD
  fix: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.store.sqlite.path, "/tmp/registry.db");
        assert_eq!(config.authority.api, "https://mds.test.datacite.org");
        assert_eq!(config.authority.username.as_deref(), Some("GBIF.GBIF"));
        assert_eq!(config.authority.timeout_secs, 5);
        assert_eq!(config.doi.prefix, "10.21373");
        assert_eq!(config.lifecycle.handler_type, LifecycleType::Webhook);
        assert_eq!(
            config.validate().unwrap(),
            RunMode::FailedSweep(Some(DoiType::Download))
        );
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut config = Config::default();
        config.doi.prefix = "15468".to_string();
        config.run.failed_sweep = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_validate_requires_webhook_endpoint() {
        let mut config = Config::default();
        config.lifecycle.handler_type = LifecycleType::Webhook;
        config.run.failed_sweep = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingWebhookEndpoint)
        ));
    }
}
