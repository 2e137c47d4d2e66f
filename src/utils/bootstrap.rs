//! Bootstrap utilities for the doisync binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the DOISYNC_LOG environment variable.
///
/// Defaults to "info" level if DOISYNC_LOG is not set. Log lines go to
/// stderr so they never interleave with the report on stdout.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// The configuration file path, taken from the first command-line argument.
pub fn parse_config_path() -> Option<String> {
    std::env::args().nth(1).filter(|arg| !arg.trim().is_empty())
}
