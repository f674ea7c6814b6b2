pub mod backend;
pub mod batch;
pub mod error;
pub mod payload;
pub mod webhook;

pub use backend::{CustomerBackend, create_customer, fetch_customers};
pub use batch::{BatchCreateReport, BatchFailureEntry, BatchProgress, create_batch};
pub use error::{IngestError, Result};
pub use payload::{STDIN_PATH, load_json, load_payload, parse_payload};
pub use webhook::{DEFAULT_TIMEOUT_SECS, WebhookClient, WebhookConfig};
