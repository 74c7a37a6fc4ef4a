//! Change notifications emitted by the registry.

use crate::history::DiffHistoryState;
use serde::{Deserialize, Serialize};

/// Kind of transition a [`ChangeEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    Registered,
    Set,
    Accepted,
    Rejected,
    Undone,
    Redone,
    Removed,
}

/// Summary of a key right after a transition was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub key: String,
    pub transition: Transition,
    pub is_diff_mode: bool,
    pub history_len: usize,
    pub redo_len: usize,
}

impl ChangeEvent {
    pub fn new<T>(key: &str, transition: Transition, record: &DiffHistoryState<T>) -> Self {
        Self {
            key: key.to_string(),
            transition,
            is_diff_mode: record.diff_state().is_diff_mode,
            history_len: record.history().len(),
            redo_len: record.redo_stack().len(),
        }
    }
}

/// Callback registered with `Registry::on_change`.
pub type ChangeListener = Box<dyn FnMut(&ChangeEvent) + Send>;
