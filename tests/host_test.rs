//! Tests for the handle-based host registry

use rstest::{fixture, rstest};
use treebuilder::util::testing;
use treebuilder::{DomainError, ForestHandle, HostRegistry, NodeHandle, TraversalOrder};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Registry holding one forest: root 7 with children 3, 9, 1.
#[fixture]
fn registry() -> (HostRegistry, ForestHandle, NodeHandle) {
    let mut registry = HostRegistry::new();
    let forest = registry.create_forest();
    let root = registry.add_root(forest, 7).unwrap();
    for v in [3, 9, 1] {
        registry.add_child(root, v).unwrap();
    }
    (registry, forest, root)
}

fn child_values(registry: &HostRegistry, node: NodeHandle) -> Vec<i64> {
    (0..registry.children_count(node))
        .filter_map(|i| registry.child_at(node, i))
        .filter_map(|c| registry.value(c))
        .collect()
}

// ============================================================
// Construction and access
// ============================================================

#[rstest]
fn given_forest_when_reading_through_handles_then_sees_structure(
    registry: (HostRegistry, ForestHandle, NodeHandle),
) {
    let (registry, forest, root) = registry;

    assert_eq!(registry.first_root(forest), Some(root));
    assert_eq!(registry.value(root), Some(7));
    assert_eq!(registry.children_count(root), 3);
    assert_eq!(child_values(&registry, root), vec![3, 9, 1]);
    assert!(registry.child_at(root, 3).is_none());
}

#[rstest]
fn given_start_forest_when_called_then_creates_single_root() {
    let mut registry = HostRegistry::new();
    let forest = registry.start_forest(5, 0).unwrap();

    let root = registry.first_root(forest).unwrap();
    assert_eq!(registry.value(root), Some(5));
    assert_eq!(registry.children_count(root), 0);
}

#[rstest]
fn given_unknown_code_when_starting_forest_then_creates_nothing() {
    let mut registry = HostRegistry::new();
    let err = registry.start_forest(5, 9).unwrap_err();

    assert_eq!(err, DomainError::UnknownTranslation("9".into()));
    assert!(registry.is_empty());
}

#[rstest]
fn given_empty_forest_when_asking_first_root_then_none() {
    let mut registry = HostRegistry::new();
    let forest = registry.create_forest();
    assert!(registry.first_root(forest).is_none());
}

// ============================================================
// Translation codes
// ============================================================

#[rstest]
#[case(0, vec![1, 9, 3])]
#[case(1, vec![1, 9, 3])]
#[case(2, vec![1, 3, 9])]
#[case(3, vec![9, 3, 1])]
fn given_translation_code_when_translating_then_children_reordered(
    registry: (HostRegistry, ForestHandle, NodeHandle),
    #[case] code: i32,
    #[case] expected: Vec<i64>,
) {
    let (mut registry, forest, root) = registry;

    registry.translate(forest, code).unwrap();

    assert_eq!(child_values(&registry, root), expected);
}

#[rstest]
fn given_bad_code_when_translating_then_forest_unchanged(
    registry: (HostRegistry, ForestHandle, NodeHandle),
) {
    let (mut registry, forest, root) = registry;

    assert!(registry.translate(forest, 42).is_err());
    assert_eq!(child_values(&registry, root), vec![3, 9, 1]);
}

// ============================================================
// Stale handles
// ============================================================

#[rstest]
fn given_destroyed_forest_when_using_handles_then_all_accessors_are_safe(
    registry: (HostRegistry, ForestHandle, NodeHandle),
) {
    let (mut registry, forest, root) = registry;

    assert!(registry.destroy_forest(forest));
    assert!(!registry.destroy_forest(forest));

    assert!(registry.first_root(forest).is_none());
    assert_eq!(registry.value(root), None);
    assert_eq!(registry.children_count(root), 0);
    assert!(registry.child_at(root, 0).is_none());
    assert_eq!(
        registry.add_child(root, 1).unwrap_err(),
        DomainError::InvalidForestHandle
    );
    assert_eq!(
        registry.add_root(forest, 1).unwrap_err(),
        DomainError::InvalidForestHandle
    );
    assert_eq!(
        registry.translate(forest, 0).unwrap_err(),
        DomainError::InvalidForestHandle
    );
}

#[rstest]
fn given_destroyed_forest_when_creating_new_one_then_old_handle_stays_stale(
    registry: (HostRegistry, ForestHandle, NodeHandle),
) {
    let (mut registry, forest, root) = registry;
    registry.destroy_forest(forest);

    let fresh = registry.create_forest();
    registry.add_root(fresh, 100).unwrap();

    assert_ne!(fresh, forest);
    assert!(registry.first_root(forest).is_none());
    assert_eq!(registry.value(root), None);
    assert_eq!(registry.len(), 1);
}

#[rstest]
fn given_removed_node_when_using_its_handle_then_reports_invalid_handle(
    registry: (HostRegistry, ForestHandle, NodeHandle),
) {
    let (mut registry, forest, root) = registry;
    let victim = registry.child_at(root, 1).unwrap();

    registry
        .forest_mut(forest)
        .unwrap()
        .node_mut(root.node())
        .unwrap()
        .remove_child(victim.node())
        .unwrap();

    assert_eq!(registry.value(victim), None);
    assert_eq!(
        registry.add_child(victim, 5).unwrap_err(),
        DomainError::InvalidHandle(victim.node())
    );
    assert_eq!(child_values(&registry, root), vec![3, 1]);
}

#[rstest]
fn given_two_forests_when_traversing_each_then_they_are_independent() {
    let mut registry = HostRegistry::new();
    let a = registry.start_forest(1, 2).unwrap();
    let b = registry.start_forest(2, 2).unwrap();
    let root_a = registry.first_root(a).unwrap();
    registry.add_child(root_a, 10).unwrap();

    let path_a: Vec<&i64> = registry.forest(a).unwrap().path(TraversalOrder::PreOrder);
    let path_b: Vec<&i64> = registry.forest(b).unwrap().path(TraversalOrder::PreOrder);
    assert_eq!(path_a, vec![&1, &10]);
    assert_eq!(path_b, vec![&2]);
}
