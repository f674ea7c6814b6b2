//! Tests for hierarchy flattening.

use std::collections::HashSet;

use proptest::prelude::*;
use subhub_model::{Entity, EntityKind};
use subhub_normalization::{flatten_hierarchy, sub_organizations_only};

fn org(id: &str, children: Vec<Entity>) -> Entity {
    Entity::new(id, format!("Org {id}"), EntityKind::Organization, 0).with_children(children)
}

fn sub(id: &str) -> Entity {
    Entity::new(id, format!("Sub {id}"), EntityKind::SubOrganization, 0)
}

#[test]
fn parents_are_followed_by_their_children() {
    let entities = vec![org("A", vec![sub("A1"), sub("A2")]), org("B", vec![])];

    let rows = flatten_hierarchy(&entities);

    let ids: Vec<_> = rows.iter().map(|row| row.entity.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "A1", "A2", "B"]);
    let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["org-A", "suborg-A-A1", "suborg-A-A2", "org-B"]);
    assert_eq!(rows[1].parent_display_name(), Some("Org A"));
    assert_eq!(rows[2].parent_display_name(), Some("Org A"));
    assert_eq!(rows[3].parent_display_name(), None);
}

#[test]
fn childless_entity_contributes_one_row() {
    let rows = flatten_hierarchy(&[org("solo", vec![])]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "org-solo");
}

#[test]
fn dashed_ids_that_alias_stay_distinct() {
    // ("a-b", "c") and ("a", "b-c") both spell suborg-a-b-c.
    let rows = flatten_hierarchy(&[org("a-b", vec![sub("c")]), org("a", vec![sub("b-c")])]);
    let keys: HashSet<_> = rows.iter().map(|row| row.key.clone()).collect();
    assert_eq!(keys.len(), rows.len());
}

#[test]
fn flattening_does_not_touch_input() {
    let entities = vec![org("A", vec![sub("A1")])];
    let snapshot = entities.clone();
    let _ = flatten_hierarchy(&entities);
    assert_eq!(entities, snapshot);
    assert_eq!(entities[0].children[0].parent_display_name, None);
}

fn id_strategy() -> impl Strategy<Value = String> {
    // Small alphabet with separators so collisions are frequent.
    "[ab1#-]{0,3}"
}

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (
        id_strategy(),
        prop::collection::vec(id_strategy(), 0..4),
    )
        .prop_map(|(id, child_ids)| {
            let children = child_ids.iter().map(|child| sub(child)).collect();
            org(&id, children)
        })
}

proptest! {
    #[test]
    fn keys_are_pairwise_distinct(entities in prop::collection::vec(entity_strategy(), 0..8)) {
        let rows = flatten_hierarchy(&entities);
        let keys: HashSet<_> = rows.iter().map(|row| row.key.as_str()).collect();
        prop_assert_eq!(keys.len(), rows.len());
    }

    #[test]
    fn row_count_and_order_match_hierarchy(entities in prop::collection::vec(entity_strategy(), 0..8)) {
        let rows = flatten_hierarchy(&entities);
        let expected: Vec<&str> = entities
            .iter()
            .flat_map(|entity| {
                std::iter::once(entity.id.as_str())
                    .chain(entity.children.iter().map(|child| child.id.as_str()))
            })
            .collect();
        let actual: Vec<&str> = rows.iter().map(|row| row.entity.id.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn sub_org_filter_keeps_only_children(entities in prop::collection::vec(entity_strategy(), 0..8)) {
        let rows = flatten_hierarchy(&entities);
        let subs = sub_organizations_only(&rows);
        let child_total: usize = entities.iter().map(|entity| entity.children.len()).sum();
        prop_assert_eq!(subs.len(), child_total);
        prop_assert!(subs.iter().all(|row| row.parent_display_name().is_some()));
    }
}
