//! Draft store configuration.

use std::path::PathBuf;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Default draft file name, relative to the working directory.
pub const DEFAULT_DRAFTS_FILE: &str = "subhub-drafts.json";

/// Default draft lifetime.
pub const DEFAULT_EXPIRY_HOURS: u64 = 24;

/// Where drafts live and how long they are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftStoreConfig {
    /// Path of the JSON draft file.
    pub path: PathBuf,

    /// Drafts older than this many hours are discarded on read.
    pub expiry_hours: u64,
}

impl Default for DraftStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DRAFTS_FILE),
            expiry_hours: DEFAULT_EXPIRY_HOURS,
        }
    }
}

impl DraftStoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_expiry_hours(mut self, hours: u64) -> Self {
        self.expiry_hours = hours;
        self
    }

    /// Draft lifetime as a duration (saturates for absurd hour counts).
    pub fn expiry(&self) -> TimeDelta {
        i64::try_from(self.expiry_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .unwrap_or(TimeDelta::MAX)
    }
}
