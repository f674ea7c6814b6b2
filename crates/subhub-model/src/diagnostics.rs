use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::entity::Entity;

/// Why a source record was excluded from an accepted batch.
///
/// On the wire `reason` carries the same text as [`RejectReason::as_str`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail")]
pub enum RejectReason {
    /// No id alias resolved to a non-blank value.
    #[serde(rename = "missing id")]
    MissingId,
    /// No name alias resolved to a non-blank value.
    #[serde(rename = "missing name")]
    MissingName,
    /// The record could not be read (wrong shape, bad timestamp, ...).
    #[serde(rename = "transform error")]
    TransformError(String),
}

impl RejectReason {
    /// Short human-readable reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingId => "missing id",
            RejectReason::MissingName => "missing name",
            RejectReason::TransformError(_) => "transform error",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            RejectReason::TransformError(detail) => Some(detail),
            _ => None,
        }
    }

    /// True for the missing-required-field family.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, RejectReason::MissingId | RejectReason::MissingName)
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Position in the source list (0-based).
    pub index: usize,
    /// The original record, untouched.
    pub record: Value,
    #[serde(flatten)]
    pub reason: RejectReason,
}

impl Rejection {
    pub fn new(index: usize, record: Value, reason: RejectReason) -> Self {
        Self {
            index,
            record,
            reason,
        }
    }
}

/// The whole response broke the list contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum BatchFailure {
    /// Null or empty body.
    EmptyPayload,
    /// Top-level value was something other than a list.
    NotAList { found: String },
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFailure::EmptyPayload => f.write_str("payload is empty"),
            BatchFailure::NotAList { found } => {
                write!(f, "payload is not a list (found {found})")
            }
        }
    }
}

/// Result of normalizing one source response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub entities: Vec<Entity>,
    pub rejections: Vec<Rejection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    /// An empty outcome carrying a batch-level failure.
    pub fn failed(failure: BatchFailure) -> Self {
        Self {
            entities: Vec::new(),
            rejections: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.entities.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejections.len()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// No batch failure and no rejected records.
    pub fn is_clean(&self) -> bool {
        self.failure.is_none() && self.rejections.is_empty()
    }
}
