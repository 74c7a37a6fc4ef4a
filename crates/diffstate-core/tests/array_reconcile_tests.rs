//! Array Reconciler Tests
//!
//! Identity-based annotation of object arrays, on its own and as a
//! registration strategy.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use diffstate_core::{
    add_diff_to_array_objs, apply_patches, reconcile, ArrayReconcileStrategy, ReconcileOptions,
    RegisterOptions, Registry, RemovedPolicy,
};
use serde_json::json;

#[test]
fn test_changed_item_is_marked_changed() {
    let old = vec![json!({"id": "1", "name": "Item 1"})];
    let new = vec![json!({"id": "1", "name": "Item 1 Updated"})];

    let result = reconcile(&old, &new, "id", "");

    assert_eq!(result[0]["diff"], json!("changed"));
    assert_eq!(result[0]["name"], json!("Item 1 Updated"));
}

#[test]
fn test_new_item_is_marked_added() {
    let result = reconcile(&[], &[json!({"id": "3", "name": "X"})], "id", "");

    assert_eq!(result, vec![json!({"id": "3", "name": "X", "diff": "added"})]);
}

#[test]
fn test_identical_item_is_left_unmarked() {
    let item = json!({"id": "1", "name": "same"});
    let result = reconcile(&[item.clone()], &[item.clone()], "id", "");
    assert_eq!(result, vec![item]);
}

#[test]
fn test_stale_marker_is_cleared() {
    let old = vec![json!({"id": "1", "name": "same"})];
    let new = vec![json!({"id": "1", "name": "same", "diff": "changed"})];

    let result = reconcile(&old, &new, "id", "");

    assert_eq!(result, vec![json!({"id": "1", "name": "same"})]);
}

#[test]
fn test_custom_id_field_and_nested_diff_path() {
    let old = vec![json!({"key": "a", "data": {"label": "A", "size": 1}})];
    let new = vec![
        json!({"key": "a", "data": {"label": "A", "size": 2}}),
        json!({"key": "b", "data": {"label": "B", "size": 1}}),
    ];

    let result = reconcile(&old, &new, "key", "/data");

    assert_eq!(
        result,
        vec![
            json!({"key": "a", "data": {"label": "A", "size": 2, "diff": "changed"}}),
            json!({"key": "b", "data": {"label": "B", "size": 1, "diff": "added"}}),
        ]
    );
}

#[test]
fn test_diff_path_creates_missing_nested_object() {
    let result = reconcile(&[], &[json!({"id": 1})], "id", "/meta/ui");
    assert_eq!(result, vec![json!({"id": 1, "meta": {"ui": {"diff": "added"}}})]);
}

#[test]
fn test_inputs_are_not_mutated() {
    let old = vec![json!({"id": "1", "v": 1})];
    let new = vec![json!({"id": "1", "v": 2})];
    let (old_before, new_before) = (old.clone(), new.clone());

    let _ = reconcile(&old, &new, "id", "");

    assert_eq!(old, old_before);
    assert_eq!(new, new_before);
}

#[test]
fn test_removed_items_dropped_by_default() {
    let old = vec![json!({"id": "1"}), json!({"id": "2"})];
    let new = vec![json!({"id": "2"})];

    let result = reconcile(&old, &new, "id", "");

    assert_eq!(result, vec![json!({"id": "2"})]);
}

#[test]
fn test_removed_items_retained_when_requested() {
    let old = vec![json!({"id": "1"}), json!({"id": "2"}), json!({"id": "3"})];
    let new = vec![json!({"id": "2"})];
    let options = ReconcileOptions::default().with_removed(RemovedPolicy::Retain);

    let result = add_diff_to_array_objs(&old, &new, &options);

    assert_eq!(
        result,
        vec![
            json!({"id": "2"}),
            json!({"id": "1", "diff": "removed"}),
            json!({"id": "3", "diff": "removed"}),
        ]
    );
}

#[test]
fn test_custom_marker_field() {
    let options = ReconcileOptions::default().with_marker_field("_status");
    let result = add_diff_to_array_objs(&[], &[json!({"id": 1})], &options);
    assert_eq!(result, vec![json!({"id": 1, "_status": "added"})]);
}

#[test]
fn test_reconcile_strategy_registered_on_a_key() {
    // GIVEN a list registered with the reconciling strategy
    let mut registry = Registry::new();
    let strategy = registry.reconcile_strategy("/rows");
    registry.register(
        "table",
        json!({"rows": [{"id": "1", "name": "a"}, {"id": "2", "name": "b"}]}),
        RegisterOptions::default().with_compute_state(strategy),
    );

    // WHEN an edited list is proposed
    registry.set_diff_state(
        "table",
        json!({"rows": [{"id": "1", "name": "a"}, {"id": "2", "name": "B"}, {"id": "9", "name": "z"}]}),
        true,
    );

    // THEN the proposal carries markers and the patches replay it exactly
    let state = registry.diff_history_state("table").unwrap().diff_state();
    assert_eq!(
        state.new_state,
        json!({"rows": [
            {"id": "1", "name": "a"},
            {"id": "2", "name": "B", "diff": "changed"},
            {"id": "9", "name": "z", "diff": "added"}
        ]})
    );
    assert_eq!(apply_patches(&state.old_state, &state.patches).unwrap(), state.new_state);

    // AND rejecting restores the unmarked baseline
    registry.reject_all_diffs("table");
    assert_eq!(
        registry.clean_state("table").unwrap()["rows"][1],
        json!({"id": "2", "name": "b"})
    );
}

#[test]
fn test_reconcile_strategy_uses_explicit_options() {
    let options = ReconcileOptions::default()
        .with_id_field("key")
        .with_diff_path("/data");
    let mut registry = Registry::new();
    registry.register(
        "list",
        json!([]),
        RegisterOptions::default().with_compute_state(ArrayReconcileStrategy::new("", options)),
    );

    registry.set_diff_state("list", json!([{"key": "k", "data": {"v": 1}}]), true);

    assert_eq!(
        registry.clean_state("list"),
        Some(&json!([{"key": "k", "data": {"v": 1, "diff": "added"}}]))
    );
}

#[test]
fn test_reconcile_strategy_accepts_path_without_leading_slash() {
    // GIVEN a strategy addressing the items as "rows"
    let mut registry = Registry::new();
    let strategy = registry.reconcile_strategy("rows");
    registry.register(
        "table",
        json!({"rows": [{"id": "1", "n": "a"}]}),
        RegisterOptions::default().with_compute_state(strategy),
    );

    // WHEN a diff edits one row and adds another
    registry.set_diff_state("table", json!({"rows": [{"id": "1", "n": "b"}, {"id": "2"}]}), true);

    // THEN both rows carry markers
    let record = registry.diff_history_state("table").unwrap();
    assert_eq!(
        record.diff_state().new_state,
        json!({"rows": [
            {"id": "1", "n": "b", "diff": "changed"},
            {"id": "2", "diff": "added"}
        ]})
    );
}
