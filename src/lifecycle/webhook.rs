//! HTTP webhook lifecycle handler.
//!
//! POSTs each change as a JSON document to a configured endpoint.

use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::LifecycleEvent;
use crate::config::WebhookConfig;
use crate::interfaces::lifecycle::{LifecycleError, LifecycleHandler, Result};
use crate::model::{Dataset, Doi, Download, User};
use crate::utils::retry::{http_backoff, is_retryable_error, is_retryable_status};

const MAX_RETRIES: usize = 5;

/// Wire envelope of a posted change.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    id: Uuid,
    time: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a LifecycleEvent,
}

/// Webhook handler.
///
/// Transient failures (timeouts, connection errors, 429, 5xx) are retried;
/// anything else is reported as a rejection.
pub struct WebhookLifecycleHandler {
    client: Client,
    config: WebhookConfig,
}

impl WebhookLifecycleHandler {
    /// Create a new webhook handler with the given configuration.
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(LifecycleError::Config(
                "Webhook endpoint not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn post_once(&self, body: &str) -> Result<()> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .body(body.to_string());

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(endpoint = %self.config.endpoint, "Lifecycle change posted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = format!(
            "HTTP {} - {}",
            status,
            body.chars().take(200).collect::<String>()
        );
        if is_retryable_status(status) {
            warn!(endpoint = %self.config.endpoint, status = %status, "Webhook returned retryable status");
            Err(LifecycleError::Unavailable(detail))
        } else {
            error!(endpoint = %self.config.endpoint, status = %status, "Webhook rejected change");
            Err(LifecycleError::Rejected(detail))
        }
    }

    async fn post(&self, event: LifecycleEvent) -> Result<()> {
        let body = serde_json::to_string(&Envelope {
            id: Uuid::new_v4(),
            time: Utc::now(),
            event: &event,
        })?;

        (|| async { self.post_once(&body).await })
            .retry(http_backoff(MAX_RETRIES))
            .when(|e| {
                matches!(e, LifecycleError::Http(err) if is_retryable_error(err))
                    || matches!(e, LifecycleError::Unavailable(_))
            })
            .await
    }
}

#[async_trait]
impl LifecycleHandler for WebhookLifecycleHandler {
    async fn dataset_changed(&self, dataset: &Dataset, previous: Option<&Doi>) -> Result<()> {
        self.post(LifecycleEvent::dataset(dataset, previous)).await
    }

    async fn download_changed(
        &self,
        download: &Download,
        previous: Option<&Download>,
        user: &User,
    ) -> Result<()> {
        self.post(LifecycleEvent::download(download, previous, user))
            .await
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_endpoint_fails() {
        let result = WebhookLifecycleHandler::new(WebhookConfig::default());
        assert!(matches!(result, Err(LifecycleError::Config(_))));
    }

    #[test]
    fn test_envelope_flattens_event() {
        let dataset = Dataset::new(Uuid::new_v4(), "Fish", Some(Doi::parse("10.1/a").unwrap()));
        let event = LifecycleEvent::dataset(&dataset, None);
        let json = serde_json::to_value(Envelope {
            id: Uuid::new_v4(),
            time: Utc::now(),
            event: &event,
        })
        .unwrap();

        assert!(json["id"].is_string());
        assert!(json["time"].is_string());
        assert_eq!(json["event"], "dataset_changed");
        assert_eq!(json["doi"], "10.1/a");
        assert!(json["previous_doi"].is_null());
    }
}
