//! Storage implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageType, StoreConfig};
use crate::interfaces::{IdentifierStore, StoreError};

pub mod mock;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use mock::MockIdentifierStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteIdentifierStore;

/// Initialize the identifier store based on configuration.
///
/// The registry database is opened read-only unless `init_schema` is set,
/// in which case the file is created if missing and the schema applied.
pub async fn init_store(config: &StoreConfig) -> Result<Arc<dyn IdentifierStore>, StoreError> {
    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let path = &config.sqlite.path;
            info!("Storage: sqlite at {}", path);

            let url = if config.sqlite.init_schema {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                }
                format!("sqlite:{}?mode=rwc", path)
            } else {
                format!("sqlite:{}?mode=ro", path)
            };

            let pool = sqlx::SqlitePool::connect(&url).await?;
            let store = SqliteIdentifierStore::new(pool);
            if config.sqlite.init_schema {
                store.init().await?;
            }
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => Err(StoreError::Unavailable(
            "SQLite storage requested but 'sqlite' feature is not enabled".to_string(),
        )),
    }
}
