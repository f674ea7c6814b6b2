//! Tests for fetch, create and batch creation against an in-memory backend.

use std::cell::RefCell;

use serde_json::{Value, json};
use subhub_ingest::{
    BatchProgress, CustomerBackend, IngestError, Result, create_batch, create_customer,
    fetch_customers,
};
use subhub_model::{BatchFailure, CreateCustomerRequest, EntityKind, RejectReason};
use subhub_normalization::EntityNormalizer;

/// Answers fetches with a fixed payload and creates with numbered records.
struct FakeBackend {
    payload: Value,
    fail_names: Vec<&'static str>,
    created: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn new(payload: Value) -> Self {
        Self {
            payload,
            fail_names: Vec::new(),
            created: RefCell::new(Vec::new()),
        }
    }

    fn failing_on(mut self, name: &'static str) -> Self {
        self.fail_names.push(name);
        self
    }
}

impl CustomerBackend for FakeBackend {
    fn fetch_all(&self) -> Result<Value> {
        Ok(self.payload.clone())
    }

    fn create(&self, request: &CreateCustomerRequest) -> Result<Value> {
        if self.fail_names.contains(&request.name.as_str()) {
            return Err(IngestError::Webhook {
                status: 500,
                message: "workflow failed".to_string(),
            });
        }
        let mut created = self.created.borrow_mut();
        created.push(request.name.clone());
        let id = created.len().to_string();
        Ok(json!([{
            "customer_id": id,
            "customer_name": request.name,
            "customer_type": request.kind.wire_value(),
            "created_at": 1_700_000_000
        }]))
    }
}

#[test]
fn fetch_normalizes_payload() {
    let backend = FakeBackend::new(json!([
        {"id": "1", "name": "Acme"},
        {"id": "2"}
    ]));
    let outcome = fetch_customers(&backend, &EntityNormalizer::default()).expect("fetch");
    assert_eq!(outcome.accepted_count(), 1);
    assert_eq!(outcome.rejections[0].reason, RejectReason::MissingName);
}

#[test]
fn fetch_surfaces_batch_failure_without_error() {
    let backend = FakeBackend::new(json!({"message": "Workflow was started"}));
    let outcome = fetch_customers(&backend, &EntityNormalizer::default()).expect("fetch");
    assert_eq!(
        outcome.failure,
        Some(BatchFailure::NotAList {
            found: "object".to_string()
        })
    );
}

#[test]
fn create_unwraps_single_record_list() {
    let backend = FakeBackend::new(Value::Null);
    let entity = create_customer(
        &backend,
        &EntityNormalizer::default(),
        &CreateCustomerRequest::sub_organization("Acme East", "7"),
    )
    .expect("create");
    assert_eq!(entity.id, "1");
    assert_eq!(entity.name, "Acme East");
    assert_eq!(entity.kind, EntityKind::SubOrganization);
    assert_eq!(entity.created_at, 1_700_000_000);
}

#[test]
fn create_validates_before_sending() {
    let backend = FakeBackend::new(Value::Null);
    let result = create_customer(
        &backend,
        &EntityNormalizer::default(),
        &CreateCustomerRequest::organization("  "),
    );
    assert!(matches!(result, Err(IngestError::InvalidRequest(_))));
    assert!(backend.created.borrow().is_empty());
}

struct EchoBackend(Value);

impl CustomerBackend for EchoBackend {
    fn fetch_all(&self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn create(&self, _request: &CreateCustomerRequest) -> Result<Value> {
        Ok(self.0.clone())
    }
}

#[test]
fn create_rejects_unusable_record() {
    let backend = EchoBackend(json!({"status": "ok"}));
    let result = create_customer(
        &backend,
        &EntityNormalizer::default(),
        &CreateCustomerRequest::organization("Acme"),
    );
    match result {
        Err(IngestError::Rejected { reason, record }) => {
            assert_eq!(reason, RejectReason::MissingId);
            assert_eq!(record, json!({"status": "ok"}));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn batch_continues_after_failure() {
    let backend = FakeBackend::new(Value::Null).failing_on("Beta");
    let requests = vec![
        CreateCustomerRequest::organization("Alpha"),
        CreateCustomerRequest::organization("Beta"),
        CreateCustomerRequest::sub_organization("Gamma", "1"),
    ];
    let mut updates: Vec<BatchProgress> = Vec::new();

    let report = create_batch(
        &backend,
        &EntityNormalizer::default(),
        &requests,
        |progress| updates.push(progress),
    );

    assert_eq!(report.total(), 3);
    assert!(report.has_failures());
    let names: Vec<_> = report.created.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Gamma"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].name, "Beta");

    assert_eq!(updates.len(), 3);
    assert_eq!(
        updates[1],
        BatchProgress {
            completed: 2,
            total: 3,
            succeeded: 1,
            failed: 1
        }
    );
    assert!(updates[2].is_done());
    assert_eq!(*backend.created.borrow(), vec!["Alpha", "Gamma"]);
}

#[test]
fn empty_batch_reports_nothing() {
    let backend = FakeBackend::new(Value::Null);
    let mut calls = 0;
    let report = create_batch(&backend, &EntityNormalizer::default(), &[], |_| calls += 1);
    assert_eq!(report.total(), 0);
    assert_eq!(calls, 0);
}
