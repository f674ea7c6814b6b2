//! Blocking webhook client for the workflow-automation backend.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subhub_model::CreateCustomerRequest;
use tracing::debug;

use crate::backend::CustomerBackend;
use crate::error::{IngestError, Result};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the customer webhooks live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Base URL of the webhook host, e.g. `https://automation.example.com/webhook`.
    pub base_url: String,
    /// Path of the fetch-all webhook, relative to `base_url`.
    pub fetch_path: String,
    /// Path of the create webhook, relative to `base_url`.
    pub create_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            fetch_path: "customers".to_string(),
            create_path: "customers/create".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WebhookConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn fetch_url(&self) -> String {
        join_url(&self.base_url, &self.fetch_path)
    }

    pub fn create_url(&self) -> String {
        join_url(&self.base_url, &self.create_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Client for the customer webhooks.
pub struct WebhookClient {
    client: Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Create a new client; fails when no base URL is configured.
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(IngestError::MissingBaseUrl);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn user_agent() -> String {
        format!("subhub/{}", env!("CARGO_PKG_VERSION"))
    }

    fn read_json(response: Response) -> Result<Value> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IngestError::Webhook { status, message });
        }
        let body = response.text()?;
        crate::payload::parse_payload(&body)
    }
}

impl CustomerBackend for WebhookClient {
    fn fetch_all(&self) -> Result<Value> {
        let url = self.config.fetch_url();
        debug!(url = %url, "fetching customers");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        Self::read_json(response)
    }

    fn create(&self, request: &CreateCustomerRequest) -> Result<Value> {
        let url = self.config.create_url();
        debug!(url = %url, name = %request.name, kind = %request.kind, "creating customer");
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()?;
        Self::read_json(response)
    }
}
