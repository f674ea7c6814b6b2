//! On-disk draft file types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current draft file schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Root draft file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// Drafts keyed by form identifier.
    #[serde(default)]
    pub drafts: BTreeMap<String, DraftEntry>,
}

impl Default for DraftFile {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            drafts: BTreeMap::new(),
        }
    }
}

/// One saved draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    /// When the draft was saved (RFC 3339).
    pub saved_at: String,

    /// The form state as entered.
    pub value: Value,
}

impl DraftEntry {
    pub fn new(value: Value, saved_at: DateTime<Utc>) -> Self {
        Self {
            saved_at: saved_at.to_rfc3339(),
            value,
        }
    }

    /// Parse the saved_at timestamp.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
