//! Per-key history state machine
//!
//! [`DiffHistoryState`] owns the live [`DiffState`] of one key together with
//! its undo (`history`) and `redo_stack` stacks. Every transition that
//! changes the live state first moves the previous state onto exactly one of
//! the stacks:
//!
//! | transition | previous state goes to | redo stack |
//! |---|---|---|
//! | `set` | history | cleared |
//! | `accept` / `reject` | history | untouched |
//! | `undo` | redo | - |
//! | `redo` | history | - |
//!
//! Transitions check their precondition before touching anything, so a
//! refused transition leaves the record exactly as it was.

use crate::errors::DiffStateError;
use crate::model::{DiffMode, DiffState, HistoryLimit};
use crate::strategy::ComputeState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    NotInDiffMode,
    HistoryEmpty,
    RedoEmpty,
}

impl Refusal {
    /// Attach the registry key the refusal happened on
    pub fn into_error(self, key: &str) -> DiffStateError {
        let key = key.to_string();
        match self {
            Refusal::NotInDiffMode => DiffStateError::NotInDiffMode { key },
            Refusal::HistoryEmpty => DiffStateError::HistoryEmpty { key },
            Refusal::RedoEmpty => DiffStateError::RedoEmpty { key },
        }
    }
}

/// Live state plus undo/redo stacks of one key.
///
/// Stacks are ordered oldest first; the most recent snapshot is last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHistoryState<T> {
    diff_state: DiffState<T>,
    history: VecDeque<DiffState<T>>,
    redo_stack: Vec<DiffState<T>>,
    diff_mode: DiffMode,
    #[serde(skip)]
    history_limit: HistoryLimit,
}

impl<T: Clone> DiffHistoryState<T> {
    /// Fresh record with empty stacks
    pub fn new(initial: T, diff_mode: DiffMode) -> Self {
        Self {
            diff_state: DiffState::new(initial),
            history: VecDeque::new(),
            redo_stack: Vec::new(),
            diff_mode,
            history_limit: HistoryLimit::Unbounded,
        }
    }

    pub fn with_history_limit(mut self, limit: HistoryLimit) -> Self {
        self.history_limit = limit;
        self.evict_overflow();
        self
    }

    /// Record `value` as the key's new state.
    ///
    /// With `is_diff_change` false this is a plain commit: the baseline and
    /// diff flag stay as they are, and patches are only recomputed when a
    /// diff is already pending. With `is_diff_change` true the current value
    /// is frozen as the baseline (unless a diff is already pending, in which
    /// case the existing baseline stays) and patches are measured from it.
    pub fn set(&mut self, value: T, is_diff_change: bool, strategy: &dyn ComputeState<T>) {
        let current = &self.diff_state;
        let next = if !is_diff_change && !current.is_diff_mode {
            DiffState {
                old_state: current.old_state.clone(),
                new_state: value,
                is_diff_mode: false,
                patches: Vec::new(),
            }
        } else {
            let baseline = if current.is_diff_mode {
                current.old_state.clone()
            } else {
                current.new_state.clone()
            };
            let computed = strategy.compute(&baseline, value);
            DiffState {
                old_state: baseline,
                new_state: computed.new_state,
                is_diff_mode: true,
                patches: computed.patches,
            }
        };

        let previous = std::mem::replace(&mut self.diff_state, next);
        self.push_history(previous);
        self.redo_stack.clear();
    }

    /// Confirm the pending proposal: the baseline becomes the proposal.
    ///
    /// # Errors
    ///
    /// `Refusal::NotInDiffMode` when no proposal is pending.
    pub fn accept(&mut self) -> Result<(), Refusal> {
        if !self.diff_state.is_diff_mode {
            return Err(Refusal::NotInDiffMode);
        }
        let next = DiffState::new(self.diff_state.new_state.clone());
        let previous = std::mem::replace(&mut self.diff_state, next);
        self.push_history(previous);
        Ok(())
    }

    /// Discard the pending proposal: the value reverts to the baseline.
    ///
    /// # Errors
    ///
    /// `Refusal::NotInDiffMode` when no proposal is pending.
    pub fn reject(&mut self) -> Result<(), Refusal> {
        if !self.diff_state.is_diff_mode {
            return Err(Refusal::NotInDiffMode);
        }
        let next = DiffState::new(self.diff_state.old_state.clone());
        let previous = std::mem::replace(&mut self.diff_state, next);
        self.push_history(previous);
        Ok(())
    }

    /// Restore the most recent history snapshot.
    ///
    /// # Errors
    ///
    /// `Refusal::HistoryEmpty` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<(), Refusal> {
        let restored = self.history.pop_back().ok_or(Refusal::HistoryEmpty)?;
        let current = std::mem::replace(&mut self.diff_state, restored);
        self.redo_stack.push(current);
        Ok(())
    }

    /// Re-apply the most recently undone snapshot.
    ///
    /// # Errors
    ///
    /// `Refusal::RedoEmpty` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<(), Refusal> {
        let restored = self.redo_stack.pop().ok_or(Refusal::RedoEmpty)?;
        let current = std::mem::replace(&mut self.diff_state, restored);
        self.push_history(current);
        Ok(())
    }

    fn push_history(&mut self, snapshot: DiffState<T>) {
        self.history.push_back(snapshot);
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        if let Some(max) = self.history_limit.max() {
            while self.history.len() > max {
                self.history.pop_front();
            }
        }
    }
}

impl<T> DiffHistoryState<T> {
    pub fn diff_state(&self) -> &DiffState<T> {
        &self.diff_state
    }

    /// Undo stack, oldest first
    pub fn history(&self) -> &VecDeque<DiffState<T>> {
        &self.history
    }

    /// Redo stack, most recently undone last
    pub fn redo_stack(&self) -> &[DiffState<T>] {
        &self.redo_stack
    }

    pub fn diff_mode(&self) -> DiffMode {
        self.diff_mode
    }

    pub fn history_limit(&self) -> HistoryLimit {
        self.history_limit
    }

    /// Value a host should display under this key's diff mode
    pub fn clean_state(&self) -> &T {
        self.diff_state.clean_state(self.diff_mode)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
