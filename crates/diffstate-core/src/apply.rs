//! Functional-boundary apply function
//!
//! `apply()` runs one [`Command`] against a [`Registry`] and reports the
//! outcome as a typed result.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: a command either performs its whole transition or
//!   leaves the registry exactly as it was
//! - **No panics**: unknown keys and unmet preconditions are typed errors
//! - **Listeners** are only notified for commands that succeeded
//!
//! ## Example
//!
//! ```
//! use diffstate_core::{apply, Command, Registry};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! apply(&mut registry, Command::Register {
//!     key: "counter".to_string(),
//!     initial: json!({"count": 0}),
//!     diff_mode: None,
//! }).unwrap();
//!
//! let event = apply(&mut registry, Command::SetState {
//!     key: "counter".to_string(),
//!     value: json!({"count": 1}),
//!     is_diff_change: true,
//! }).unwrap();
//! assert!(event.is_diff_mode);
//! ```

use crate::commands::Command;
use crate::errors::Result;
use crate::events::ChangeEvent;
use crate::registry::{RegisterOptions, Registry};

/// Apply a command to the registry
///
/// # Errors
///
/// - `KeyNotFound` for any command but `Register` on an unknown key
/// - `KeyAlreadyRegistered` for `Register` on a taken key
/// - `NotInDiffMode` for `AcceptAll` / `RejectAll` without a pending diff
/// - `HistoryEmpty` / `RedoEmpty` for `Undo` / `Redo` on an empty stack
///
/// The registry is unchanged whenever an error is returned.
pub fn apply(registry: &mut Registry, cmd: Command) -> Result<ChangeEvent> {
    match cmd {
        Command::Register {
            key,
            initial,
            diff_mode,
        } => {
            let options = match diff_mode {
                Some(mode) => RegisterOptions::new(mode),
                None => RegisterOptions::from_config(registry.config()),
            };
            registry.try_register(key, initial, options)
        }
        Command::SetState {
            key,
            value,
            is_diff_change,
        } => registry.try_set(&key, value, is_diff_change),
        Command::AcceptAll { key } => registry.try_accept(&key),
        Command::RejectAll { key } => registry.try_reject(&key),
        Command::Undo { key } => registry.try_undo(&key),
        Command::Redo { key } => registry.try_redo(&key),
        Command::Remove { key } => registry.remove_entry(&key).map(|(event, _)| event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::errors::DiffStateError;
    use crate::events::Transition;
    use crate::model::DiffMode;
    use serde_json::json;

    #[test]
    fn test_register_without_mode_uses_configured_default() {
        let config = EngineConfig {
            default_diff_mode: DiffMode::HoldAccept,
            ..EngineConfig::default()
        };
        let mut registry = Registry::with_config(config);

        apply(
            &mut registry,
            Command::Register {
                key: "held".to_string(),
                initial: json!(0),
                diff_mode: None,
            },
        )
        .unwrap();
        apply(
            &mut registry,
            Command::Register {
                key: "explicit".to_string(),
                initial: json!(0),
                diff_mode: Some(DiffMode::DefaultAccept),
            },
        )
        .unwrap();

        let mode = |key: &str| registry.diff_history_state(key).unwrap().diff_mode();
        assert_eq!(mode("held"), DiffMode::HoldAccept);
        assert_eq!(mode("explicit"), DiffMode::DefaultAccept);
    }

    #[test]
    fn test_apply_remove_reports_event() {
        let mut registry = Registry::new();
        registry.register("k", json!(1), RegisterOptions::default());

        let event = apply(&mut registry, Command::Remove { key: "k".to_string() }).unwrap();
        assert_eq!(event.transition, Transition::Removed);
        assert!(!registry.contains("k"));

        let err = apply(&mut registry, Command::Remove { key: "k".to_string() }).unwrap_err();
        assert_eq!(err, DiffStateError::KeyNotFound { key: "k".to_string() });
    }
}
