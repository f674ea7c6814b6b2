//! Sequential batch creation with progress reporting.
//!
//! Requests are sent one at a time, in input order. A failed request is
//! recorded and the loop moves on; nothing is retried.

use std::time::Instant;

use serde::Serialize;
use subhub_model::{CreateCustomerRequest, Entity};
use subhub_normalization::EntityNormalizer;
use tracing::{info, info_span, warn};

use crate::backend::{CustomerBackend, create_customer};
use crate::error::IngestError;

/// Progress after each processed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchProgress {
    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

/// A request that could not be completed.
#[derive(Debug)]
pub struct BatchFailureEntry {
    /// Position in the request list (0-based).
    pub index: usize,
    pub name: String,
    pub error: IngestError,
}

/// Outcome of a batch creation run.
#[derive(Debug, Default)]
pub struct BatchCreateReport {
    pub created: Vec<Entity>,
    pub failures: Vec<BatchFailureEntry>,
}

impl BatchCreateReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Create every request in order, calling `on_progress` after each one.
pub fn create_batch<B, F>(
    backend: &B,
    normalizer: &EntityNormalizer,
    requests: &[CreateCustomerRequest],
    mut on_progress: F,
) -> BatchCreateReport
where
    B: CustomerBackend + ?Sized,
    F: FnMut(BatchProgress),
{
    let span = info_span!("create_batch", total = requests.len());
    let _guard = span.enter();
    let start = Instant::now();
    let mut report = BatchCreateReport::default();
    let mut progress = BatchProgress {
        completed: 0,
        total: requests.len(),
        succeeded: 0,
        failed: 0,
    };

    for (index, request) in requests.iter().enumerate() {
        match create_customer(backend, normalizer, request) {
            Ok(entity) => {
                report.created.push(entity);
                progress.succeeded += 1;
            }
            Err(error) => {
                warn!(index, name = %request.name, error = %error, "customer create failed");
                report.failures.push(BatchFailureEntry {
                    index,
                    name: request.name.clone(),
                    error,
                });
                progress.failed += 1;
            }
        }
        progress.completed += 1;
        on_progress(progress);
    }

    info!(
        created = report.created.len(),
        failed = report.failures.len(),
        duration_ms = start.elapsed().as_millis(),
        "batch creation complete"
    );
    report
}
