//! Tests for loading payloads and request lists from disk.

use std::io::Write;
use std::path::Path;

use serde_json::{Value, json};
use subhub_ingest::{IngestError, load_json, load_payload};
use subhub_model::{CreateCustomerRequest, EntityKind};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn loads_customer_list() {
    let file = write_temp(r#"[{"customer_id": "1", "customer_name": "Acme"}]"#);
    let payload = load_payload(file.path()).expect("load");
    assert_eq!(payload, json!([{"customer_id": "1", "customer_name": "Acme"}]));
}

#[test]
fn empty_file_loads_as_null() {
    let file = write_temp("");
    assert_eq!(load_payload(file.path()).expect("load"), Value::Null);
}

#[test]
fn missing_file_reports_path() {
    let path = Path::new("/nonexistent/customers.json");
    match load_payload(path) {
        Err(IngestError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn loads_request_list() {
    let file = write_temp(
        r#"[
            {"name": "Acme"},
            {"name": "Acme East", "customer_type": "sub-org", "parent_id": "1"}
        ]"#,
    );
    let requests: Vec<CreateCustomerRequest> = load_json(file.path()).expect("load");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].kind, EntityKind::Organization);
    assert_eq!(requests[1].kind, EntityKind::SubOrganization);
    assert_eq!(requests[1].parent_id.as_deref(), Some("1"));
}

#[test]
fn malformed_request_list_is_parse_error() {
    let file = write_temp(r#"[{"name": }]"#);
    let result: Result<Vec<CreateCustomerRequest>, _> = load_json(file.path());
    assert!(matches!(result, Err(IngestError::JsonParse(_))));
}
