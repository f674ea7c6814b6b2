//! Entity normalization.
//!
//! Turns one untyped webhook record into a canonical [`Entity`], or a
//! [`RejectReason`] when the mandatory fields cannot be resolved. Nested
//! sub-organizations are normalized the same way and then filtered against
//! the parent; invalid children are dropped from that parent only.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use subhub_common::{Clock, SystemClock, json_type_name, value_to_string_non_empty, value_to_u64};
use subhub_model::{BatchFailure, BatchOutcome, Entity, EntityKind, RejectReason, Rejection};
use tracing::{debug, info, warn};

use crate::aliases::{self, AliasTable};
use crate::timestamp::{calendar_timestamp_from_value, timestamp_from_value};

/// Options for normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Source of "now" for records without a timestamp.
    pub clock: Arc<dyn Clock>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Whether a record is read as a top-level entity or as a nested child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    TopLevel,
    Child,
}

/// Normalizes customer records from the webhook backend.
#[derive(Debug, Clone, Default)]
pub struct EntityNormalizer {
    options: NormalizeOptions,
}

impl EntityNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize a single top-level record, including its children.
    pub fn normalize(&self, record: &Value) -> Result<Entity, RejectReason> {
        self.normalize_at_level(record, Level::TopLevel)
    }

    /// Normalize a record at `index` of a batch, wrapping failures as a [`Rejection`].
    pub fn normalize_indexed(&self, index: usize, record: &Value) -> Result<Entity, Rejection> {
        self.normalize(record)
            .map_err(|reason| Rejection::new(index, record.clone(), reason))
    }

    /// Normalize a full fetch-all response.
    ///
    /// A single bad record never aborts the batch: it is logged and collected
    /// as a rejection while the remaining records keep their relative order.
    /// A response that is empty or not a list yields an empty outcome with a
    /// [`BatchFailure`].
    pub fn normalize_batch(&self, payload: &Value) -> BatchOutcome {
        let start = Instant::now();
        let records = match payload {
            Value::Array(records) => records,
            Value::Null => {
                warn!("customer payload is empty");
                return BatchOutcome::failed(BatchFailure::EmptyPayload);
            }
            Value::String(s) if s.trim().is_empty() => {
                warn!("customer payload is empty");
                return BatchOutcome::failed(BatchFailure::EmptyPayload);
            }
            other => {
                let found = json_type_name(other).to_string();
                warn!(found = %found, "customer payload is not a list");
                return BatchOutcome::failed(BatchFailure::NotAList { found });
            }
        };

        let mut outcome = BatchOutcome::default();
        for (index, record) in records.iter().enumerate() {
            match self.normalize_indexed(index, record) {
                Ok(entity) => outcome.entities.push(entity),
                Err(rejection) => {
                    warn!(
                        index,
                        reason = %rejection.reason,
                        detail = rejection.reason.detail().unwrap_or(""),
                        "rejected customer record"
                    );
                    outcome.rejections.push(rejection);
                }
            }
        }
        info!(
            accepted = outcome.accepted_count(),
            rejected = outcome.rejected_count(),
            duration_ms = start.elapsed().as_millis(),
            "customer batch normalized"
        );
        outcome
    }

    fn normalize_at_level(&self, record: &Value, level: Level) -> Result<Entity, RejectReason> {
        let Value::Object(map) = record else {
            return Err(RejectReason::TransformError(format!(
                "record is a {}, expected an object",
                json_type_name(record)
            )));
        };

        let id = resolve_text(map, &aliases::ID)?.ok_or(RejectReason::MissingId)?;
        let name = resolve_text(map, &aliases::NAME)?.ok_or(RejectReason::MissingName)?;
        let kind = resolve_kind(map);
        let (created_at, created_at_synthetic) = self.resolve_created_at(map)?;
        let client_count = aliases::CLIENT_COUNT
            .resolve(map)
            .and_then(|(_, value)| value_to_u64(value))
            .unwrap_or(0);
        let parent_display_name = aliases::PARENT_NAME
            .resolve(map)
            .filter(|(_, value)| !value.is_array() && !value.is_object())
            .and_then(|(_, value)| value_to_string_non_empty(value));

        let mut entity = Entity {
            id,
            name,
            kind,
            created_at,
            created_at_synthetic,
            client_count,
            children: Vec::new(),
            parent_display_name,
        };
        // Children are one level deep: a child's own nested list is ignored.
        if level == Level::TopLevel {
            entity.children = self.normalize_children(&entity, map);
        }
        Ok(entity)
    }

    fn normalize_children(&self, parent: &Entity, map: &Map<String, Value>) -> Vec<Entity> {
        let Some((_, Value::Array(raw_children))) = aliases::CHILDREN.resolve(map) else {
            return Vec::new();
        };
        let mut children = Vec::with_capacity(raw_children.len());
        for (index, raw) in raw_children.iter().enumerate() {
            let child = match self.normalize_at_level(raw, Level::Child) {
                Ok(child) => child,
                Err(reason) => {
                    debug!(
                        parent_id = %parent.id,
                        index,
                        reason = %reason,
                        "dropping unreadable child record"
                    );
                    continue;
                }
            };
            if let Some(violation) = parent.child_violation(&child) {
                debug!(
                    parent_id = %parent.id,
                    child_id = %child.id,
                    violation = %violation,
                    "dropping malformed child reference"
                );
                continue;
            }
            children.push(child);
        }
        children
    }

    fn resolve_created_at(&self, map: &Map<String, Value>) -> Result<(i64, bool), RejectReason> {
        if let Some((key, value)) = aliases::CREATED_AT_EPOCH.resolve(map) {
            let seconds = timestamp_from_value(value).ok_or_else(|| unreadable(key, value))?;
            let synthetic = map
                .get(aliases::SYNTHETIC_TIMESTAMP_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            return Ok((seconds, synthetic));
        }
        if let Some((key, value)) = aliases::CREATED_AT_TEXT.resolve(map) {
            let seconds =
                calendar_timestamp_from_value(value).ok_or_else(|| unreadable(key, value))?;
            return Ok((seconds, false));
        }
        Ok((self.options.clock.now_epoch_seconds(), true))
    }
}

/// Resolve a scalar text field; arrays and objects are a transform error.
fn resolve_text(
    map: &Map<String, Value>,
    table: &AliasTable,
) -> Result<Option<String>, RejectReason> {
    match table.resolve(map) {
        None => Ok(None),
        Some((key, value)) if value.is_array() || value.is_object() => {
            Err(RejectReason::TransformError(format!(
                "{} alias `{key}` holds a {}",
                table.field,
                json_type_name(value)
            )))
        }
        Some((_, value)) => Ok(value_to_string_non_empty(value)),
    }
}

/// Unknown or missing customer types fall back to [`EntityKind::Organization`].
fn resolve_kind(map: &Map<String, Value>) -> EntityKind {
    aliases::KIND
        .resolve(map)
        .and_then(|(_, value)| value.as_str())
        .and_then(|raw| raw.parse::<EntityKind>().ok())
        .unwrap_or_default()
}

fn unreadable(key: &str, value: &Value) -> RejectReason {
    RejectReason::TransformError(format!(
        "timestamp alias `{key}` has unreadable {} value",
        json_type_name(value)
    ))
}

/// Normalize one record with default options.
pub fn normalize_entity(record: &Value) -> Result<Entity, RejectReason> {
    EntityNormalizer::default().normalize(record)
}

/// Normalize a fetch-all response with default options.
pub fn normalize_batch(payload: &Value) -> BatchOutcome {
    EntityNormalizer::default().normalize_batch(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use subhub_common::FixedClock;

    fn normalizer_at(seconds: i64) -> EntityNormalizer {
        EntityNormalizer::new(
            NormalizeOptions::new().with_clock(Arc::new(FixedClock::at_epoch_seconds(seconds))),
        )
    }

    #[test]
    fn lower_snake_alias_wins() {
        let entity = normalize_entity(&json!({"id": "5", "Id": "9", "name": "X"})).unwrap();
        assert_eq!(entity.id, "5");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let entity = normalize_entity(&json!({"customerId": 42, "Name": "Acme"})).unwrap();
        assert_eq!(entity.id, "42");
        assert_eq!(entity.name, "Acme");
    }

    #[test]
    fn missing_name_is_rejected() {
        let result = normalize_entity(&json!({"id": "1", "customer_type": "org"}));
        assert_eq!(result, Err(RejectReason::MissingName));
    }

    #[test]
    fn missing_id_is_rejected_before_name() {
        let result = normalize_entity(&json!({"customer_type": "org"}));
        assert_eq!(result, Err(RejectReason::MissingId));
    }

    #[test]
    fn non_object_record_is_transform_error() {
        let result = normalize_entity(&json!("acme"));
        assert!(matches!(result, Err(RejectReason::TransformError(_))));
    }

    #[test]
    fn compound_id_is_transform_error() {
        let result = normalize_entity(&json!({"id": {"value": 1}, "name": "A"}));
        assert!(matches!(result, Err(RejectReason::TransformError(_))));
    }

    #[test]
    fn unknown_kind_defaults_to_organization() {
        let entity =
            normalize_entity(&json!({"id": "1", "name": "A", "customer_type": "reseller"}))
                .unwrap();
        assert_eq!(entity.kind, EntityKind::Organization);
        let entity = normalize_entity(&json!({"id": "1", "name": "A", "customerType": 3})).unwrap();
        assert_eq!(entity.kind, EntityKind::Organization);
    }

    #[test]
    fn epoch_field_is_used_verbatim() {
        let entity = normalizer_at(0)
            .normalize(&json!({
                "id": "1",
                "name": "A",
                "created_at": 1_700_000_000,
                "created_time": "2024-01-15T10:30:00Z"
            }))
            .unwrap();
        assert_eq!(entity.created_at, 1_700_000_000);
        assert!(!entity.created_at_synthetic);
    }

    #[test]
    fn text_timestamp_is_parsed() {
        let entity = normalizer_at(0)
            .normalize(&json!({"id": "1", "name": "A", "createdTime": "2024-01-15T10:30:00Z"}))
            .unwrap();
        assert_eq!(entity.created_at, 1_705_314_600);
        assert!(!entity.created_at_synthetic);
    }

    #[test]
    fn missing_timestamp_uses_clock() {
        let entity = normalizer_at(1_234)
            .normalize(&json!({"id": "1", "name": "A"}))
            .unwrap();
        assert_eq!(entity.created_at, 1_234);
        assert!(entity.created_at_synthetic);
    }

    #[test]
    fn unparseable_timestamp_is_transform_error() {
        let result = normalize_entity(&json!({"id": "1", "name": "A", "createdTime": "soon"}));
        assert!(matches!(result, Err(RejectReason::TransformError(_))));
    }

    #[test]
    fn epoch_digits_under_text_alias_are_transform_error() {
        for created in [json!("20240115"), json!("1700000000"), json!(1_700_000_000)] {
            let result =
                normalize_entity(&json!({"id": "1", "name": "A", "created_time": created}));
            assert!(
                matches!(result, Err(RejectReason::TransformError(_))),
                "{created} accepted"
            );
        }
        let entity =
            normalize_entity(&json!({"id": "1", "name": "A", "created_at": "1700000000"}))
                .unwrap();
        assert_eq!(entity.created_at, 1_700_000_000);
    }

    #[test]
    fn large_client_count_survives_renormalization() {
        let first = normalize_entity(&json!({
            "id": "1",
            "name": "A",
            "created_at": 0,
            "client_count": u64::MAX
        }))
        .unwrap();
        assert_eq!(first.client_count, u64::MAX);
        let again = normalize_entity(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn client_count_defaults_to_zero() {
        let entity =
            normalize_entity(&json!({"id": "1", "name": "A", "client_count": -4})).unwrap();
        assert_eq!(entity.client_count, 0);
        let entity =
            normalize_entity(&json!({"id": "1", "name": "A", "ClientCount": "12"})).unwrap();
        assert_eq!(entity.client_count, 12);
    }

    #[test]
    fn children_alias_that_is_not_a_list_is_empty() {
        let entity = normalize_entity(&json!({
            "id": "1",
            "name": "A",
            "suborgs": "none",
            "children": [{"id": "2", "name": "B", "customer_type": "sub-org"}]
        }))
        .unwrap();
        assert!(entity.children.is_empty());
    }

    #[test]
    fn grandchildren_are_not_processed() {
        let entity = normalize_entity(&json!({
            "id": "1",
            "name": "A",
            "suborgs": [{
                "id": "2",
                "name": "B",
                "customer_type": "sub-org",
                "suborgs": [{"id": "3", "name": "C", "customer_type": "sub-org"}]
            }]
        }))
        .unwrap();
        assert_eq!(entity.children.len(), 1);
        assert!(entity.children[0].children.is_empty());
    }

    #[test]
    fn unreadable_children_are_dropped_locally() {
        let entity = normalize_entity(&json!({
            "id": "1",
            "name": "A",
            "suborgs": [
                {"name": "no id", "customer_type": "sub-org"},
                42,
                {"id": "4", "name": "D", "customer_type": "sub-org"}
            ]
        }))
        .unwrap();
        let ids: Vec<_> = entity.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["4"]);
    }

    #[test]
    fn batch_rejects_non_list() {
        let outcome = normalize_batch(&json!({"id": "1", "name": "A"}));
        assert_eq!(
            outcome.failure,
            Some(BatchFailure::NotAList {
                found: "object".to_string()
            })
        );
        assert!(outcome.entities.is_empty());
    }

    #[test]
    fn batch_rejects_empty_payload() {
        assert_eq!(
            normalize_batch(&Value::Null).failure,
            Some(BatchFailure::EmptyPayload)
        );
        assert_eq!(
            normalize_batch(&json!("  ")).failure,
            Some(BatchFailure::EmptyPayload)
        );
    }

    #[test]
    fn empty_list_is_a_clean_batch() {
        let outcome = normalize_batch(&json!([]));
        assert!(outcome.is_clean());
        assert_eq!(outcome.accepted_count(), 0);
    }
}
