//! Apply Command Tests
//!
//! Verifies the functional-boundary guarantees of `apply()`.
//!
//! ## Scenarios Covered
//!
//! 1. Every command variant is dispatched
//! 2. Failing commands leave the registry untouched
//! 3. Errors are typed and carry the key
//! 4. Commands replay from their JSON form

#![allow(clippy::unwrap_used, clippy::expect_used)]

use diffstate_core::{
    apply, Command, DiffMode, DiffStateError, EngineConfig, ExError, ExErrorKind, Registry,
    Transition,
};
use serde_json::json;

fn register(registry: &mut Registry, key: &str) {
    apply(
        registry,
        Command::Register {
            key: key.to_string(),
            initial: json!({"count": 0}),
            diff_mode: Some(DiffMode::DefaultAccept),
        },
    )
    .unwrap();
}

#[test]
fn test_apply_covers_every_command() {
    let mut registry = Registry::new();
    register(&mut registry, "c");
    let key = || "c".to_string();

    let set = apply(
        &mut registry,
        Command::SetState {
            key: key(),
            value: json!({"count": 1}),
            is_diff_change: true,
        },
    )
    .unwrap();
    assert_eq!(set.transition, Transition::Set);

    let accepted = apply(&mut registry, Command::AcceptAll { key: key() }).unwrap();
    assert_eq!(accepted.transition, Transition::Accepted);
    assert!(!accepted.is_diff_mode);

    let undone = apply(&mut registry, Command::Undo { key: key() }).unwrap();
    assert_eq!(undone.transition, Transition::Undone);
    assert!(undone.is_diff_mode);

    let rejected = apply(&mut registry, Command::RejectAll { key: key() }).unwrap();
    assert_eq!(rejected.transition, Transition::Rejected);
    assert_eq!(registry.clean_state("c"), Some(&json!({"count": 0})));

    let undone = apply(&mut registry, Command::Undo { key: key() }).unwrap();
    // the reject left the earlier undo on the redo stack
    assert_eq!(undone.redo_len, 2);
    let redone = apply(&mut registry, Command::Redo { key: key() }).unwrap();
    assert_eq!(redone.transition, Transition::Redone);
    assert_eq!(redone.redo_len, 1);

    let removed = apply(&mut registry, Command::Remove { key: key() }).unwrap();
    assert_eq!(removed.transition, Transition::Removed);
    assert!(registry.is_empty());
}

#[test]
fn test_apply_fails_without_partial_mutation() {
    // GIVEN a registered key with some history
    let mut registry = Registry::new();
    register(&mut registry, "c");
    apply(
        &mut registry,
        Command::SetState {
            key: "c".to_string(),
            value: json!({"count": 3}),
            is_diff_change: false,
        },
    )
    .unwrap();
    let before = registry.diff_history_state("c").unwrap().clone();

    // WHEN commands whose preconditions fail are applied
    let failures = vec![
        Command::AcceptAll { key: "c".to_string() },
        Command::RejectAll { key: "c".to_string() },
        Command::Redo { key: "c".to_string() },
        Command::Register {
            key: "c".to_string(),
            initial: json!(null),
            diff_mode: Some(DiffMode::HoldAccept),
        },
    ];
    for cmd in failures {
        assert!(apply(&mut registry, cmd).is_err());
    }

    // THEN the record is exactly as it was
    assert_eq!(registry.diff_history_state("c").unwrap(), &before);
}

#[test]
fn test_apply_surfaces_typed_errors() {
    let mut registry = Registry::new();

    let err = apply(&mut registry, Command::Undo { key: "ghost".to_string() }).unwrap_err();
    assert_eq!(err, DiffStateError::KeyNotFound { key: "ghost".to_string() });

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::NotFound);
    assert_eq!(ex.code(), "ERR_NOT_FOUND");
    assert_eq!(ex.key(), Some("ghost"));

    register(&mut registry, "c");
    let err = apply(&mut registry, Command::Undo { key: "c".to_string() }).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::HistoryEmpty);
    assert!(err.kind().is_precondition());
}

#[test]
fn test_json_register_without_mode_follows_config() {
    // GIVEN a registry configured to hold proposals
    let config = EngineConfig::from_toml_str("default_diff_mode = \"holdAccept\"").unwrap();
    let mut registry = Registry::with_config(config);

    // WHEN a register command omits diffMode
    let cmd: Command =
        serde_json::from_value(json!({"type": "register", "key": "doc", "initial": {"v": 1}}))
            .unwrap();
    apply(&mut registry, cmd).unwrap();
    registry.set_diff_state("doc", json!({"v": 2}), true);

    // THEN the proposal is held back from the clean state
    assert_eq!(
        registry.diff_history_state("doc").unwrap().diff_mode(),
        DiffMode::HoldAccept
    );
    assert_eq!(registry.clean_state("doc"), Some(&json!({"v": 1})));
}

#[test]
fn test_commands_replay_from_json() {
    let script = json!([
        {"type": "register", "key": "doc", "initial": {"title": "a"}, "diffMode": "holdAccept"},
        {"type": "setState", "key": "doc", "value": {"title": "b"}, "isDiffChange": true},
        {"type": "setState", "key": "doc", "value": {"title": "c"}, "isDiffChange": true},
        {"type": "acceptAll", "key": "doc"}
    ]);
    let commands: Vec<Command> = serde_json::from_value(script).unwrap();

    let mut registry = Registry::new();
    for cmd in commands {
        apply(&mut registry, cmd).unwrap();
    }

    let record = registry.diff_history_state("doc").unwrap();
    assert_eq!(record.diff_mode(), DiffMode::HoldAccept);
    assert_eq!(registry.clean_state("doc"), Some(&json!({"title": "c"})));
    assert_eq!(record.history().len(), 3);
}
