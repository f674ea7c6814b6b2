use serde::{Deserialize, Serialize, Serializer};

use crate::entity::EntityKind;
use crate::error::{ModelError, Result};

/// Body of a create-customer webhook call.
///
/// Serialized with the backend's snake_case keys; `customer_type` is sent as
/// the short wire value (`org` / `sub-org`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    #[serde(
        rename = "customer_type",
        default,
        serialize_with = "serialize_wire_kind"
    )]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

fn serialize_wire_kind<S: Serializer>(
    kind: &EntityKind,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.wire_value())
}

impl CreateCustomerRequest {
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Organization,
            parent_id: None,
        }
    }

    pub fn sub_organization(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::SubOrganization,
            parent_id: Some(parent_id.into()),
        }
    }

    /// Check the request before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::BlankName);
        }
        let has_parent = self
            .parent_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if self.kind.is_sub_organization() && !has_parent {
            return Err(ModelError::MissingParent(self.name.clone()));
        }
        Ok(())
    }
}
