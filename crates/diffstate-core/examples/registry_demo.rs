//! Registry Demonstration
//!
//! Walks through the diff/undo lifecycle of a few keys.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Plain commits vs diff proposals
//! 2. Accepting and rejecting a proposal
//! 3. Undo/redo over every transition
//! 4. Array reconciliation as a registration strategy
//! 5. The command boundary and change listeners

use diffstate_core::logging_facility::init;
use diffstate_core::{apply, Command, DiffMode, EngineConfig, RegisterOptions, Registry};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::from_toml_str(
        r#"
        history_limit = 50
        log_profile = "development"

        [reconcile]
        id_field = "id"
        "#,
    )?;
    init(config.log_profile);

    println!("=== DiffState Registry Demo ===\n");
    let mut registry = Registry::with_config(config);
    registry.on_change(|event| {
        println!(
            "  -> {:?} '{}' (diff: {}, history: {}, redo: {})",
            event.transition, event.key, event.is_diff_mode, event.history_len, event.redo_len
        );
    });

    // ===== Part 1: Proposals =====
    println!("## Part 1: Proposals\n");

    registry.register("counter", json!({"count": 0}), RegisterOptions::default());
    registry.set_diff_state("counter", json!({"count": 1}), false);
    registry.set_diff_state("counter", json!({"count": 2}), true);
    registry.set_diff_state("counter", json!({"count": 3}), true);

    let state = registry
        .diff_history_state("counter")
        .ok_or("counter not registered")?
        .diff_state();
    println!("baseline: {}", state.old_state);
    println!("proposal: {}", state.new_state);
    println!("patches:  {}\n", serde_json::to_string(&state.patches)?);

    registry.reject_all_diffs("counter");
    println!("after reject: {:?}", registry.clean_state("counter"));
    registry.undo("counter");
    registry.accept_all_diffs("counter");
    println!("after undo + accept: {:?}\n", registry.clean_state("counter"));

    // ===== Part 2: Held proposals =====
    println!("## Part 2: Held proposals\n");

    registry.register("title", json!("Draft"), RegisterOptions::new(DiffMode::HoldAccept));
    registry.set_diff_state("title", json!("Final"), true);
    println!("clean while pending: {:?}", registry.clean_state("title"));
    registry.accept_all_diffs("title");
    println!("clean after accept:  {:?}\n", registry.clean_state("title"));

    // ===== Part 3: Reconciled lists =====
    println!("## Part 3: Reconciled lists\n");

    let strategy = registry.reconcile_strategy("/rows");
    registry.register(
        "table",
        json!({"rows": [{"id": 1, "name": "alpha"}, {"id": 2, "name": "beta"}]}),
        RegisterOptions::default().with_compute_state(strategy),
    );
    registry.set_diff_state(
        "table",
        json!({"rows": [{"id": 1, "name": "alpha"}, {"id": 2, "name": "BETA"}, {"id": 3, "name": "gamma"}]}),
        true,
    );
    let proposal = registry.clean_state("table").ok_or("table not registered")?;
    println!("{}\n", serde_json::to_string_pretty(proposal)?);

    // ===== Part 4: Commands =====
    println!("## Part 4: Commands\n");

    let script = json!([
        {"type": "undo", "key": "table"},
        {"type": "redo", "key": "table"},
        {"type": "acceptAll", "key": "table"},
        {"type": "redo", "key": "table"}
    ]);
    for cmd in serde_json::from_value::<Vec<Command>>(script)? {
        match apply(&mut registry, cmd) {
            Ok(_) => {}
            Err(err) => println!("  x {}", err),
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
