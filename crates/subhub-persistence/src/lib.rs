//! Expiring draft storage for subhub forms.
//!
//! Partially filled create-customer forms are kept as drafts keyed by a form
//! identifier, so a user can come back to them later. Drafts older than the
//! configured lifetime (24 hours by default) are treated as gone.
//!
//! # File Format
//!
//! Drafts live in one pretty-printed JSON file:
//!
//! ```text
//! {
//!   "schema_version": 1,
//!   "drafts": {
//!     "create-org": { "saved_at": "2025-01-15T10:30:00+00:00", "value": { ... } }
//!   }
//! }
//! ```
//!
//! Writes go to a temp file that is renamed over the target.
//!
//! # Example
//!
//! ```ignore
//! use subhub_persistence::{DraftStore, DraftStoreConfig};
//!
//! let mut store = DraftStore::open_default(&DraftStoreConfig::new("drafts.json"))?;
//! store.save("create-org", serde_json::json!({"name": "Acme"}))?;
//! let draft = store.load("create-org")?;
//! ```

mod config;
mod error;
mod io;
mod store;
mod types;

pub use config::{DEFAULT_DRAFTS_FILE, DEFAULT_EXPIRY_HOURS, DraftStoreConfig};
pub use error::{PersistenceError, Result};
pub use io::{load_drafts, save_drafts};
pub use store::{DraftStore, DraftSummary};
pub use types::{CURRENT_SCHEMA_VERSION, DraftEntry, DraftFile};
