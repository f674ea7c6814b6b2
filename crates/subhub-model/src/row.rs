use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Key prefix for top-level organizations in a flattened projection.
pub const ORG_KEY_PREFIX: &str = "org-";

/// Key prefix for sub-organizations in a flattened projection.
pub const SUBORG_KEY_PREFIX: &str = "suborg-";

/// One entry of the flattened organization hierarchy.
///
/// Rows are derived on demand and never persisted. Child rows carry the
/// parent's name in `entity.parent_display_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRow {
    /// Unique key within one projection.
    pub key: String,
    #[serde(flatten)]
    pub entity: Entity,
}

impl FlattenedRow {
    pub fn is_sub_organization(&self) -> bool {
        self.entity.is_sub_organization()
    }

    pub fn parent_display_name(&self) -> Option<&str> {
        self.entity.parent_display_name.as_deref()
    }

    /// Label for selection lists: `Parent / Child` for children, the name otherwise.
    pub fn label(&self) -> String {
        match self.parent_display_name() {
            Some(parent) => format!("{parent} / {}", self.entity.name),
            None => self.entity.name.clone(),
        }
    }
}
