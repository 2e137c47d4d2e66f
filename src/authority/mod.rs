//! Registration authority clients.

use std::sync::Arc;

use tracing::info;

use crate::config::AuthorityConfig;
use crate::interfaces::{Authority, AuthorityError};

pub mod datacite;
pub mod mock;

pub use datacite::DataCiteClient;
pub use mock::MockAuthority;

/// Initialize the authority client from configuration.
pub fn init_authority(config: &AuthorityConfig) -> Result<Arc<dyn Authority>, AuthorityError> {
    info!("Authority: {}", config.api);
    Ok(Arc::new(DataCiteClient::new(config.clone())?))
}
