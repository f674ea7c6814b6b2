//! Error types for customer ingestion.

use std::path::PathBuf;

use subhub_model::{ModelError, RejectReason};
use thiserror::Error;

/// Errors that can occur while loading or exchanging customer data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The webhook answered with a non-success status.
    #[error("webhook returned HTTP {status}: {message}")]
    Webhook {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// No webhook base URL was configured.
    #[error("webhook base URL is not configured")]
    MissingBaseUrl,

    /// Failed to read a payload file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// A create request was refused before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ModelError),

    /// The backend answered a create call with a record that does not normalize.
    #[error("backend returned an unusable record: {reason}")]
    Rejected {
        reason: RejectReason,
        record: serde_json::Value,
    },
}

impl IngestError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the customer webhook. Check the URL and your connection.",
            Self::Webhook { .. } => "The customer webhook reported an error.",
            Self::MissingBaseUrl => "No webhook URL configured. Pass --webhook-url or set it in the config file.",
            Self::Read { .. } => "Could not read the payload file.",
            Self::JsonParse(_) => "The payload is not valid JSON.",
            Self::InvalidRequest(_) => "The create request is incomplete.",
            Self::Rejected { .. } => "The backend returned a customer record that could not be read.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Webhook { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
