//! Canonical customer entities.
//!
//! An [`Entity`] is an organization or sub-organization after normalization.
//! Top-level entities own a single level of sub-organization children.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ModelError, Result};

/// Position of a customer in the organization hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Top-level customer.
    #[default]
    #[serde(alias = "org")]
    Organization,
    /// Customer nested under an organization; clients are assigned here.
    #[serde(alias = "sub-org", alias = "sub_org")]
    SubOrganization,
}

impl EntityKind {
    /// Canonical name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Organization => "organization",
            EntityKind::SubOrganization => "sub_organization",
        }
    }

    /// Short value the webhook backend uses for `customer_type`.
    pub fn wire_value(&self) -> &'static str {
        match self {
            EntityKind::Organization => "org",
            EntityKind::SubOrganization => "sub-org",
        }
    }

    pub fn is_sub_organization(&self) -> bool {
        matches!(self, EntityKind::SubOrganization)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Parse a customer type as spelled by the backend or by this crate.
    /// Matching is trimmed and case-insensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "org" | "organization" | "organisation" => Ok(EntityKind::Organization),
            "sub-org" | "sub_org" | "suborg" | "sub-organization" | "sub_organization"
            | "suborganization" => Ok(EntityKind::SubOrganization),
            _ => Err(format!("Unknown customer type: {s}")),
        }
    }
}

/// Why a nested record cannot be a child of a given parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildViolation {
    /// The child is not a sub-organization.
    WrongKind(EntityKind),
    /// The child has the parent's own id.
    SelfReference,
}

impl fmt::Display for ChildViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildViolation::WrongKind(kind) => write!(f, "child kind is {kind}"),
            ChildViolation::SelfReference => f.write_str("child references its parent"),
        }
    }
}

/// Canonical organization or sub-organization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    /// Set when `created_at` was synthesized because the source had no timestamp.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub created_at_synthetic: bool,
    #[serde(default)]
    pub client_count: u64,
    /// Sub-organizations, one level deep.
    #[serde(default)]
    pub children: Vec<Entity>,
    /// Display-only label of the parent in flattened projections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_display_name: Option<String>,
}

impl Entity {
    /// Build an entity with default counters and no children.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: EntityKind,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            created_at,
            created_at_synthetic: false,
            client_count: 0,
            children: Vec::new(),
            parent_display_name: None,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Entity>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_client_count(mut self, count: u64) -> Self {
        self.client_count = count;
        self
    }

    pub fn is_sub_organization(&self) -> bool {
        self.kind.is_sub_organization()
    }

    /// Check whether `child` may appear in this entity's `children`.
    pub fn child_violation(&self, child: &Entity) -> Option<ChildViolation> {
        if !child.kind.is_sub_organization() {
            return Some(ChildViolation::WrongKind(child.kind));
        }
        if child.id == self.id {
            return Some(ChildViolation::SelfReference);
        }
        None
    }

    /// Drop children that violate the parent relation, returning how many were removed.
    ///
    /// Kept children lose their own `children`; the relation is one level deep.
    pub fn retain_valid_children(&mut self) -> usize {
        let before = self.children.len();
        let children = std::mem::take(&mut self.children);
        let mut kept = Vec::with_capacity(children.len());
        for mut child in children {
            if let Some(violation) = self.child_violation(&child) {
                debug!(
                    parent_id = %self.id,
                    child_id = %child.id,
                    violation = %violation,
                    "dropping malformed child reference"
                );
                continue;
            }
            if !child.children.is_empty() {
                debug!(
                    parent_id = %self.id,
                    child_id = %child.id,
                    dropped = child.children.len(),
                    "ignoring nested children of a child"
                );
                child.children.clear();
            }
            kept.push(child);
        }
        self.children = kept;
        before - self.children.len()
    }

    /// Apply a whole-field update.
    ///
    /// Each field present in `update` replaces the current value outright.
    /// Replaced children are filtered with the same rules as normalization;
    /// the number of dropped children is returned.
    pub fn apply_update(&mut self, update: EntityUpdate) -> Result<usize> {
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(ModelError::BlankName);
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(count) = update.client_count {
            self.client_count = count;
        }
        match update.children {
            Some(children) => {
                self.children = children;
                Ok(self.retain_valid_children())
            }
            None => Ok(0),
        }
    }
}

/// Whole-field replacement for an existing [`Entity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entity>>,
}
