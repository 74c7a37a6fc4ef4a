//! Host-owned registry of diff-tracked state
//!
//! A [`Registry`] maps string keys to independently registered
//! [`DiffHistoryState`] records. Values are stored as `serde_json::Value`;
//! typed hosts go through `register_typed` / `set_typed` / `clean_state_as`.
//!
//! Two surfaces are offered over the same transitions:
//!
//! - the boolean surface (`set_diff_state`, `accept_all_diffs`, `undo`, ...)
//!   never fails: an unregistered key or unmet precondition is logged and
//!   reported as `false`;
//! - the strict surface (`try_set`, `try_accept`, ...) returns the typed
//!   error instead.
//!
//! Either way a refused operation changes nothing. Methods take `&mut self`;
//! a host sharing the registry across threads wraps it in its own lock.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::errors::{DiffStateError, Result};
use crate::events::{ChangeEvent, ChangeListener, Transition};
use crate::history::{DiffHistoryState, Refusal};
use crate::model::{DiffMode, HistoryLimit};
use crate::strategy::{ArrayReconcileStrategy, ComputeState, JsonPatchStrategy};
use crate::{log_op_end, log_op_error, log_op_rejected, log_op_start};

pub const OP_REGISTER: &str = "register";
pub const OP_SET: &str = "set_diff_state";
pub const OP_ACCEPT: &str = "accept_all_diffs";
pub const OP_REJECT: &str = "reject_all_diffs";
pub const OP_UNDO: &str = "undo";
pub const OP_REDO: &str = "redo";
pub const OP_REMOVE: &str = "remove";

/// Per-key settings supplied at registration.
pub struct RegisterOptions {
    pub diff_mode: DiffMode,
    compute_state: Option<Box<dyn ComputeState<Value>>>,
    history_limit: Option<HistoryLimit>,
}

impl RegisterOptions {
    pub fn new(diff_mode: DiffMode) -> Self {
        Self {
            diff_mode,
            compute_state: None,
            history_limit: None,
        }
    }

    /// Options carrying the configured default diff mode
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.default_diff_mode)
    }

    /// Replace the default patch computer for this key
    pub fn with_compute_state(mut self, strategy: impl ComputeState<Value> + 'static) -> Self {
        self.compute_state = Some(Box::new(strategy));
        self
    }

    /// Override the registry-wide history limit for this key
    pub fn with_history_limit(mut self, limit: HistoryLimit) -> Self {
        self.history_limit = Some(limit);
        self
    }
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self::new(DiffMode::DefaultAccept)
    }
}

impl std::fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("diff_mode", &self.diff_mode)
            .field("custom_compute_state", &self.compute_state.is_some())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

struct Entry {
    record: DiffHistoryState<Value>,
    strategy: Box<dyn ComputeState<Value>>,
}

/// Keyed collection of diff-tracked state.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
    config: EngineConfig,
    listeners: BTreeMap<u64, ChangeListener>,
    next_listener_id: u64,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Registry")
            .field("keys", &keys)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reconciling strategy for the array at `items_path`, using the
    /// configured reconcile defaults
    pub fn reconcile_strategy(&self, items_path: impl AsRef<str>) -> ArrayReconcileStrategy {
        ArrayReconcileStrategy::new(items_path, self.config.reconcile.clone())
    }

    // ===== Registration =====

    /// Register `key` with `initial` as both baseline and current value.
    ///
    /// Returns `false` and leaves the existing entry alone if `key` is taken.
    pub fn register(&mut self, key: impl Into<String>, initial: Value, options: RegisterOptions) -> bool {
        self.try_register(key, initial, options).is_ok()
    }

    /// Strict form of [`Self::register`].
    ///
    /// # Errors
    ///
    /// `KeyAlreadyRegistered` if `key` is taken.
    pub fn try_register(
        &mut self,
        key: impl Into<String>,
        initial: Value,
        options: RegisterOptions,
    ) -> Result<ChangeEvent> {
        let key = key.into();
        let started = Instant::now();
        log_op_start!(OP_REGISTER, key = key.as_str());

        let outcome = if self.entries.contains_key(&key) {
            Err(DiffStateError::KeyAlreadyRegistered { key: key.clone() })
        } else {
            let limit = options
                .history_limit
                .unwrap_or_else(|| self.config.history_limit());
            let record = DiffHistoryState::new(initial, options.diff_mode).with_history_limit(limit);
            let strategy = options
                .compute_state
                .unwrap_or_else(|| Box::new(JsonPatchStrategy));
            let event = ChangeEvent::new(&key, Transition::Registered, &record);
            self.entries.insert(key.clone(), Entry { record, strategy });
            Ok(event)
        };

        self.finish(OP_REGISTER, &key, started, outcome)
    }

    /// Register a serializable value.
    ///
    /// # Errors
    ///
    /// `Serialization` if `initial` cannot be converted to JSON. A taken key
    /// is reported as `Ok(false)`.
    pub fn register_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        initial: &T,
        options: RegisterOptions,
    ) -> Result<bool> {
        let value = serde_json::to_value(initial)?;
        Ok(self.register(key, value, options))
    }

    /// Drop `key` and return its final record.
    pub fn remove(&mut self, key: &str) -> Option<DiffHistoryState<Value>> {
        self.remove_entry(key).ok().map(|(_, record)| record)
    }

    pub(crate) fn remove_entry(&mut self, key: &str) -> Result<(ChangeEvent, DiffHistoryState<Value>)> {
        let started = Instant::now();
        log_op_start!(OP_REMOVE, key = key);

        let removed = self
            .entries
            .remove(key)
            .map(|entry| entry.record)
            .ok_or_else(|| DiffStateError::KeyNotFound {
                key: key.to_string(),
            });
        let outcome = match &removed {
            Ok(record) => Ok(ChangeEvent::new(key, Transition::Removed, record)),
            Err(err) => Err(err.clone()),
        };

        let event = self.finish(OP_REMOVE, key, started, outcome)?;
        removed.map(|record| (event, record))
    }

    // ===== Mutation =====

    /// Record a new value for `key`; see [`DiffHistoryState::set`].
    ///
    /// Returns `false` (and logs a warning) if `key` is not registered.
    pub fn set_diff_state(&mut self, key: &str, value: Value, is_diff_change: bool) -> bool {
        self.try_set(key, value, is_diff_change).is_ok()
    }

    /// Strict form of [`Self::set_diff_state`].
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if `key` is not registered.
    pub fn try_set(&mut self, key: &str, value: Value, is_diff_change: bool) -> Result<ChangeEvent> {
        self.transition(OP_SET, key, move |entry| {
            entry
                .record
                .set(value, is_diff_change, entry.strategy.as_ref());
            Ok(Transition::Set)
        })
    }

    /// Record a serializable value for `key`.
    ///
    /// # Errors
    ///
    /// `Serialization` if `value` cannot be converted to JSON. An
    /// unregistered key is reported as `Ok(false)`.
    pub fn set_typed<T: Serialize>(&mut self, key: &str, value: &T, is_diff_change: bool) -> Result<bool> {
        let value = serde_json::to_value(value)?;
        Ok(self.set_diff_state(key, value, is_diff_change))
    }

    /// Confirm the pending proposal of `key`. `false` if none is pending.
    pub fn accept_all_diffs(&mut self, key: &str) -> bool {
        self.try_accept(key).is_ok()
    }

    /// # Errors
    ///
    /// `KeyNotFound`, or `NotInDiffMode` when no proposal is pending.
    pub fn try_accept(&mut self, key: &str) -> Result<ChangeEvent> {
        self.transition(OP_ACCEPT, key, |entry| {
            entry.record.accept().map(|_| Transition::Accepted)
        })
    }

    /// Discard the pending proposal of `key`. `false` if none is pending.
    pub fn reject_all_diffs(&mut self, key: &str) -> bool {
        self.try_reject(key).is_ok()
    }

    /// # Errors
    ///
    /// `KeyNotFound`, or `NotInDiffMode` when no proposal is pending.
    pub fn try_reject(&mut self, key: &str) -> Result<ChangeEvent> {
        self.transition(OP_REJECT, key, |entry| {
            entry.record.reject().map(|_| Transition::Rejected)
        })
    }

    /// Step `key` back one snapshot. `false` if its history is empty.
    pub fn undo(&mut self, key: &str) -> bool {
        self.try_undo(key).is_ok()
    }

    /// # Errors
    ///
    /// `KeyNotFound`, or `HistoryEmpty`.
    pub fn try_undo(&mut self, key: &str) -> Result<ChangeEvent> {
        self.transition(OP_UNDO, key, |entry| {
            entry.record.undo().map(|_| Transition::Undone)
        })
    }

    /// Re-apply the last undone snapshot of `key`. `false` if none.
    pub fn redo(&mut self, key: &str) -> bool {
        self.try_redo(key).is_ok()
    }

    /// # Errors
    ///
    /// `KeyNotFound`, or `RedoEmpty`.
    pub fn try_redo(&mut self, key: &str) -> Result<ChangeEvent> {
        self.transition(OP_REDO, key, |entry| {
            entry.record.redo().map(|_| Transition::Redone)
        })
    }

    // ===== Reads =====

    pub fn diff_history_state(&self, key: &str) -> Option<&DiffHistoryState<Value>> {
        self.entries.get(key).map(|entry| &entry.record)
    }

    /// `new_state` under `DefaultAccept`, `old_state` under `HoldAccept`
    pub fn clean_state(&self, key: &str) -> Option<&Value> {
        self.diff_history_state(key).map(DiffHistoryState::clean_state)
    }

    /// Clean state deserialized into `T`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound`, or `Serialization` if the value does not fit `T`.
    pub fn clean_state_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .clean_state(key)
            .ok_or_else(|| DiffStateError::KeyNotFound {
                key: key.to_string(),
            })?;
        Ok(T::deserialize(value)?)
    }

    pub fn can_undo(&self, key: &str) -> bool {
        self.diff_history_state(key)
            .is_some_and(DiffHistoryState::can_undo)
    }

    pub fn can_redo(&self, key: &str) -> bool {
        self.diff_history_state(key)
            .is_some_and(DiffHistoryState::can_redo)
    }

    /// Snapshots available to `undo`; `None` for an unknown key
    pub fn history_len(&self, key: &str) -> Option<usize> {
        self.diff_history_state(key).map(|record| record.history().len())
    }

    pub fn redo_len(&self, key: &str) -> Option<usize> {
        self.diff_history_state(key).map(|record| record.redo_stack().len())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ===== Listeners =====

    /// Call `listener` after every applied transition. Returns an id for
    /// [`Self::off_change`].
    pub fn on_change<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn off_change(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    // ===== Internals =====

    fn transition<F>(&mut self, op: &'static str, key: &str, apply: F) -> Result<ChangeEvent>
    where
        F: FnOnce(&mut Entry) -> std::result::Result<Transition, Refusal>,
    {
        let started = Instant::now();
        log_op_start!(op, key = key);

        let outcome = match self.entries.get_mut(key) {
            None => Err(DiffStateError::KeyNotFound {
                key: key.to_string(),
            }),
            Some(entry) => match apply(&mut *entry) {
                Ok(transition) => Ok(ChangeEvent::new(key, transition, &entry.record)),
                Err(refusal) => Err(refusal.into_error(key)),
            },
        };

        self.finish(op, key, started, outcome)
    }

    fn finish(
        &mut self,
        op: &'static str,
        key: &str,
        started: Instant,
        outcome: Result<ChangeEvent>,
    ) -> Result<ChangeEvent> {
        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(event) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    key = key,
                    is_diff_mode = event.is_diff_mode,
                    history_len = event.history_len,
                    redo_len = event.redo_len,
                );
                for listener in self.listeners.values_mut() {
                    listener(event);
                }
            }
            Err(err) if err.kind().is_precondition() => {
                log_op_rejected!(op, err.clone(), duration_ms = duration_ms);
            }
            Err(err) => {
                log_op_error!(op, err.clone(), duration_ms = duration_ms, key = key);
            }
        }
        outcome
    }
}
