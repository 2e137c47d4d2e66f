//! doisync: DOI reconciliation and repair
//!
//! Runs the diagnose/export/repair pipeline over the DOIs selected by the
//! `run` section of the configuration.
//!
//! ## Configuration
//! - `config.yaml` in the working directory, the file given as first
//!   argument, or the file named by DOISYNC_CONFIG
//! - DOISYNC__* environment variables (e.g. `DOISYNC__RUN__FIX=true`)
//! - DOISYNC_LOG: log filter (default "info")

use std::sync::Arc;

use tracing::{error, info};

use doisync::authority::init_authority;
use doisync::config::{Config, RunMode};
use doisync::lifecycle::{init_lifecycle, PrefixIssuer};
use doisync::services::{BatchDriver, BatchOptions, DiagnosticEngine, RepairEngine};
use doisync::storage::init_store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    doisync::utils::bootstrap::init_tracing();

    let config_path = doisync::utils::bootstrap::parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let mode = match config.validate() {
        Ok(mode) => mode,
        Err(e) => {
            println!(" {}", e);
            return Ok(());
        }
    };

    let store = init_store(&config.store).await?;
    let authority = init_authority(&config.authority)?;
    let lifecycle = init_lifecycle(&config.lifecycle)?;
    let issuer = Arc::new(PrefixIssuer::new(config.doi.prefix.clone()));
    info!(prefix = %config.doi.prefix, "Collaborators initialized");

    let mut driver = BatchDriver::new(
        store.clone(),
        DiagnosticEngine::new(store.clone(), authority),
        RepairEngine::new(store, issuer, lifecycle),
        BatchOptions::from(&config.run),
        std::io::stdout(),
    );

    let report = match mode {
        RunMode::ListFailed(doi_type) => {
            let count = driver.list_failed(doi_type).await?;
            info!(count, "Listed FAILED DOIs");
            return Ok(());
        }
        RunMode::Single(doi) => driver.run_single(&doi).await?,
        RunMode::List(path) => driver.run_list_file(&path).await?,
        RunMode::FailedSweep(doi_type) => driver.run_failed_sweep(doi_type).await?,
    };

    if report.len() > 1 {
        println!("{}", report.summary());
    }
    Ok(())
}
