//! Hierarchy flattening for search and selection lists.
//!
//! Produces `[E1, E1.children..., E2, E2.children..., ...]`, one row per
//! entity, each with a key that is unique within the projection.

use std::collections::HashSet;

use subhub_model::{Entity, FlattenedRow, ORG_KEY_PREFIX, SUBORG_KEY_PREFIX};
use tracing::warn;

/// Hands out row keys, disambiguating repeats with a `#n` suffix.
#[derive(Debug, Default)]
struct KeyRegistry {
    seen: HashSet<String>,
}

impl KeyRegistry {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
        }
    }

    fn claim(&mut self, key: String) -> String {
        if self.seen.insert(key.clone()) {
            return key;
        }
        let mut occurrence = 2usize;
        loop {
            let candidate = format!("{key}#{occurrence}");
            if self.seen.insert(candidate.clone()) {
                warn!(key = %key, assigned = %candidate, "duplicate flattened row key");
                return candidate;
            }
            occurrence += 1;
        }
    }
}

/// Flatten top-level entities and their children into display rows.
///
/// Top-level rows are keyed `org-{id}`; child rows are keyed
/// `suborg-{parent id}-{child id}` (the child's position when its id is empty)
/// and carry the parent's name as `parent_display_name`.
pub fn flatten_hierarchy(entities: &[Entity]) -> Vec<FlattenedRow> {
    let capacity = entities.iter().map(|entity| 1 + entity.children.len()).sum();
    let mut rows = Vec::with_capacity(capacity);
    let mut keys = KeyRegistry::with_capacity(capacity);

    for entity in entities {
        rows.push(FlattenedRow {
            key: keys.claim(format!("{ORG_KEY_PREFIX}{}", entity.id)),
            entity: entity.clone(),
        });
        for (index, child) in entity.children.iter().enumerate() {
            let child_ref = if child.id.is_empty() {
                index.to_string()
            } else {
                child.id.clone()
            };
            let mut child = child.clone();
            child.parent_display_name = Some(entity.name.clone());
            rows.push(FlattenedRow {
                key: keys.claim(format!("{SUBORG_KEY_PREFIX}{}-{child_ref}", entity.id)),
                entity: child,
            });
        }
    }
    rows
}

/// Rows that clients can be assigned to.
pub fn sub_organizations_only(rows: &[FlattenedRow]) -> Vec<&FlattenedRow> {
    rows.iter().filter(|row| row.is_sub_organization()).collect()
}

/// Case-insensitive substring search over name, id and parent name.
///
/// A blank query matches every row. Row order is preserved.
pub fn search_rows<'a>(rows: &'a [FlattenedRow], query: &str) -> Vec<&'a FlattenedRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            row.entity.name.to_lowercase().contains(&needle)
                || row.entity.id.to_lowercase().contains(&needle)
                || row
                    .parent_display_name()
                    .is_some_and(|parent| parent.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use subhub_model::EntityKind;

    fn org(id: &str, name: &str, children: Vec<Entity>) -> Entity {
        Entity::new(id, name, EntityKind::Organization, 0).with_children(children)
    }

    fn sub(id: &str, name: &str) -> Entity {
        Entity::new(id, name, EntityKind::SubOrganization, 0)
    }

    #[test]
    fn keys_follow_prefix_rules() {
        let rows = flatten_hierarchy(&[org("1", "Acme", vec![sub("2", "East")])]);
        let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["org-1", "suborg-1-2"]);
    }

    #[test]
    fn child_without_id_uses_position() {
        let rows = flatten_hierarchy(&[org("1", "Acme", vec![sub("", "Unnamed")])]);
        assert_eq!(rows[1].key, "suborg-1-0");
    }

    #[test]
    fn duplicate_ids_get_distinct_keys() {
        let rows = flatten_hierarchy(&[org("1", "A", vec![]), org("1", "B", vec![])]);
        assert_eq!(rows[0].key, "org-1");
        assert_eq!(rows[1].key, "org-1#2");
    }

    #[test]
    fn top_level_rows_keep_parent_name_unset() {
        let rows = flatten_hierarchy(&[org("1", "Acme", vec![sub("2", "East")])]);
        assert_eq!(rows[0].parent_display_name(), None);
        assert_eq!(rows[1].parent_display_name(), Some("Acme"));
    }

    #[test]
    fn sub_organization_filter() {
        let rows = flatten_hierarchy(&[
            org("1", "Acme", vec![sub("2", "East"), sub("3", "West")]),
            org("4", "Globex", vec![]),
        ]);
        let keys: Vec<_> = sub_organizations_only(&rows)
            .into_iter()
            .map(|row| row.key.as_str())
            .collect();
        assert_eq!(keys, vec!["suborg-1-2", "suborg-1-3"]);
    }

    #[test]
    fn search_matches_parent_name() {
        let rows = flatten_hierarchy(&[
            org("1", "Acme", vec![sub("2", "East")]),
            org("4", "Globex", vec![]),
        ]);
        let hits: Vec<_> = search_rows(&rows, "ACME")
            .into_iter()
            .map(|row| row.key.as_str())
            .collect();
        assert_eq!(hits, vec!["org-1", "suborg-1-2"]);
        assert_eq!(search_rows(&rows, "  ").len(), 3);
        assert!(search_rows(&rows, "initech").is_empty());
    }
}
