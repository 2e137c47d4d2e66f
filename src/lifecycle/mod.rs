//! Lifecycle handlers and the issuer policy.

use std::sync::Arc;

use tracing::info;

use crate::config::{LifecycleConfig, LifecycleType};
use crate::interfaces::{LifecycleError, LifecycleHandler};

mod event;
pub mod issuer;
pub mod log;
pub mod mock;
pub mod webhook;

pub use event::LifecycleEvent;
pub use issuer::PrefixIssuer;
pub use log::LogLifecycleHandler;
pub use mock::RecordingLifecycleHandler;
pub use webhook::WebhookLifecycleHandler;

/// Initialize the lifecycle handler based on configuration.
pub fn init_lifecycle(
    config: &LifecycleConfig,
) -> Result<Arc<dyn LifecycleHandler>, LifecycleError> {
    match config.handler_type {
        LifecycleType::Log => {
            info!("Lifecycle handler: log");
            Ok(Arc::new(LogLifecycleHandler::new()))
        }
        LifecycleType::Webhook => {
            info!("Lifecycle handler: webhook at {}", config.webhook.endpoint);
            Ok(Arc::new(WebhookLifecycleHandler::new(
                config.webhook.clone(),
            )?))
        }
    }
}
