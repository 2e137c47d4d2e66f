//! Lifecycle handler configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Lifecycle handler type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleType {
    /// Log the changes only.
    #[default]
    Log,
    /// POST the changes to a webhook.
    Webhook,
}

/// Lifecycle handler configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    #[serde(rename = "type")]
    pub handler_type: LifecycleType,
    pub webhook: WebhookConfig,
}

/// Webhook handler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Endpoint receiving change events.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Additional headers to include.
    pub headers: BTreeMap<String, String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: 30,
            headers: BTreeMap::new(),
        }
    }
}
