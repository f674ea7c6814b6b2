//! Key-value draft store with time-based expiry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::Value;
use subhub_common::{Clock, SystemClock};

use crate::config::DraftStoreConfig;
use crate::error::Result;
use crate::io::{load_drafts, save_drafts};
use crate::types::{DraftEntry, DraftFile};

/// Listing row for one stored draft. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSummary {
    pub key: String,
    pub saved_at: String,
    pub expires_at: Option<String>,
    pub expired: bool,
}

/// Form drafts persisted to a single JSON file.
///
/// Every mutation is written through to disk. Expiry is judged against the
/// injected [`Clock`]; a draft whose timestamp cannot be read counts as
/// expired.
#[derive(Debug)]
pub struct DraftStore {
    path: PathBuf,
    expiry: TimeDelta,
    clock: Arc<dyn Clock>,
    file: DraftFile,
}

impl DraftStore {
    /// Open the store described by `config`, reading any existing drafts.
    pub fn open(config: &DraftStoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let file = load_drafts(&config.path)?;
        Ok(Self {
            path: config.path.clone(),
            expiry: config.expiry(),
            clock,
            file,
        })
    }

    /// Open with the system clock.
    pub fn open_default(config: &DraftStoreConfig) -> Result<Self> {
        Self::open(config, Arc::new(SystemClock))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }

    /// Store `value` under `key`, replacing any previous draft.
    pub fn save(&mut self, key: &str, value: Value) -> Result<()> {
        let entry = DraftEntry::new(value, self.clock.now());
        self.file.drafts.insert(key.to_string(), entry);
        tracing::debug!(key, "draft saved");
        self.persist()
    }

    /// The live draft under `key`. An expired draft is evicted and `None`
    /// is returned.
    pub fn load(&mut self, key: &str) -> Result<Option<Value>> {
        let Some(entry) = self.file.drafts.get(key) else {
            return Ok(None);
        };
        if self.is_expired(entry) {
            self.file.drafts.remove(key);
            tracing::debug!(key, "draft expired");
            self.persist()?;
            return Ok(None);
        }
        Ok(Some(entry.value.clone()))
    }

    /// Delete the draft under `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        if self.file.drafts.remove(key).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Keys of drafts that have not expired, in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.file
            .drafts
            .iter()
            .filter(|(_, entry)| !self.is_expired(entry))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Every stored draft, expired or not, in key order.
    pub fn summaries(&self) -> Vec<DraftSummary> {
        self.file
            .drafts
            .iter()
            .map(|(key, entry)| {
                let expires_at = entry
                    .saved_at()
                    .and_then(|at| at.checked_add_signed(self.expiry))
                    .map(|at| at.to_rfc3339());
                DraftSummary {
                    key: key.clone(),
                    saved_at: entry.saved_at.clone(),
                    expires_at,
                    expired: self.is_expired(entry),
                }
            })
            .collect()
    }

    /// Drop every expired draft. Returns how many were removed.
    pub fn purge_expired(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let expiry = self.expiry;
        let before = self.file.drafts.len();
        self.file
            .drafts
            .retain(|_, entry| !expired_at(entry, now, expiry));
        let purged = before - self.file.drafts.len();
        if purged > 0 {
            tracing::info!(purged, "purged expired drafts");
            self.persist()?;
        }
        Ok(purged)
    }

    fn is_expired(&self, entry: &DraftEntry) -> bool {
        expired_at(entry, self.clock.now(), self.expiry)
    }

    fn persist(&self) -> Result<()> {
        save_drafts(&self.file, &self.path)
    }
}

fn expired_at(entry: &DraftEntry, now: DateTime<Utc>, expiry: TimeDelta) -> bool {
    match entry.saved_at() {
        Some(saved_at) => now - saved_at > expiry,
        None => true,
    }
}
