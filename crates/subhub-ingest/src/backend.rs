//! The remote customer source and the operations built on it.

use serde_json::Value;
use subhub_model::{BatchOutcome, CreateCustomerRequest, Entity};
use subhub_normalization::EntityNormalizer;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// A backend that stores customers and answers with raw records.
///
/// [`crate::WebhookClient`] talks to the workflow-automation webhooks; tests
/// substitute in-memory fakes.
pub trait CustomerBackend {
    /// Fetch every customer as the backend returns them.
    fn fetch_all(&self) -> Result<Value>;

    /// Create one customer and return the backend's record for it.
    fn create(&self, request: &CreateCustomerRequest) -> Result<Value>;
}

/// Fetch all customers and normalize the response.
pub fn fetch_customers<B: CustomerBackend + ?Sized>(
    backend: &B,
    normalizer: &EntityNormalizer,
) -> Result<BatchOutcome> {
    let payload = backend.fetch_all()?;
    let outcome = normalizer.normalize_batch(&payload);
    info!(
        accepted = outcome.accepted_count(),
        rejected = outcome.rejected_count(),
        failed = outcome.is_failure(),
        "fetched customers"
    );
    Ok(outcome)
}

/// Create one customer and normalize the record the backend returns.
///
/// Some webhooks wrap the created record in a one-element list; that wrapper
/// is removed before normalization.
pub fn create_customer<B: CustomerBackend + ?Sized>(
    backend: &B,
    normalizer: &EntityNormalizer,
    request: &CreateCustomerRequest,
) -> Result<Entity> {
    request.validate()?;
    let response = backend.create(request)?;
    let record = match response {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    match normalizer.normalize(&record) {
        Ok(entity) => {
            debug!(id = %entity.id, name = %entity.name, "customer created");
            Ok(entity)
        }
        Err(reason) => Err(IngestError::Rejected { reason, record }),
    }
}
