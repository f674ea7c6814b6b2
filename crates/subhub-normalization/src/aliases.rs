//! Field alias tables.
//!
//! The webhook backend spells the same field several ways. Each canonical
//! field has a fixed, ordered list of accepted keys; lookup is case-sensitive
//! and the first key holding a non-blank value wins.

use serde_json::{Map, Value};
use subhub_common::is_blank;

/// Ordered key spellings for one canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasTable {
    /// Canonical field name, used in diagnostics.
    pub field: &'static str,
    /// Accepted keys in precedence order.
    pub keys: &'static [&'static str],
}

impl AliasTable {
    /// Find the first key present in `record` with a non-blank value.
    pub fn resolve<'a>(&self, record: &'a Map<String, Value>) -> Option<(&'static str, &'a Value)> {
        first_present(record, self.keys)
    }
}

/// Generic "first present wins" lookup.
///
/// A key is present when it exists and its value is neither `null` nor a
/// blank string.
pub fn first_present<'a>(
    record: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .filter(|value| !is_blank(value))
            .map(|value| (*key, value))
    })
}

pub const ID: AliasTable = AliasTable {
    field: "id",
    keys: &["id", "customer_id", "customerId", "CustomerId", "Id"],
};

pub const NAME: AliasTable = AliasTable {
    field: "name",
    keys: &["name", "customer_name", "customerName", "CustomerName", "Name"],
};

pub const KIND: AliasTable = AliasTable {
    field: "kind",
    keys: &[
        "customer_type",
        "customerType",
        "CustomerType",
        "Customer_Type",
        "kind",
    ],
};

/// Numeric epoch-seconds timestamp.
pub const CREATED_AT_EPOCH: AliasTable = AliasTable {
    field: "createdAt",
    keys: &["created_at", "createdAt", "CreatedAt", "Created_At"],
};

/// Calendar date-time text.
pub const CREATED_AT_TEXT: AliasTable = AliasTable {
    field: "createdTime",
    keys: &["created_time", "createdTime", "CreatedTime", "Created_Time"],
};

pub const CLIENT_COUNT: AliasTable = AliasTable {
    field: "clientCount",
    keys: &["client_count", "clientCount", "ClientCount", "Client_Count"],
};

pub const CHILDREN: AliasTable = AliasTable {
    field: "children",
    keys: &["suborgs", "sub_orgs", "subOrgs", "SubOrgs", "children"],
};

pub const PARENT_NAME: AliasTable = AliasTable {
    field: "parentDisplayName",
    keys: &["parent_name", "parentName", "ParentName", "parentDisplayName"],
};

/// Marker written next to `createdAt` when the timestamp was synthesized.
pub const SYNTHETIC_TIMESTAMP_KEY: &str = "createdAtSynthetic";

/// Every table, in the order fields are resolved.
pub const ALL: [AliasTable; 8] = [
    ID,
    NAME,
    KIND,
    CREATED_AT_EPOCH,
    CREATED_AT_TEXT,
    CLIENT_COUNT,
    CHILDREN,
    PARENT_NAME,
];
