//! Per-key state records.

use crate::diff::Patch;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Acceptance policy of a registered key, fixed at registration.
///
/// Decides which side of a pending diff counts as the key's clean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffMode {
    /// Proposals are shown as soon as they arrive: clean value is `new_state`
    #[default]
    DefaultAccept,
    /// Proposals are held until accepted: clean value is `old_state`
    HoldAccept,
}

/// Baseline/proposal pair of one key.
///
/// `old_state` is the last confirmed baseline and `new_state` the current
/// value, confirmed or proposed. When `is_diff_mode` is false, `patches` is
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffState<T> {
    pub old_state: T,
    pub new_state: T,
    pub is_diff_mode: bool,
    pub patches: Vec<Patch>,
}

impl<T: Clone> DiffState<T> {
    /// Clean state with both sides set to `initial`
    pub fn new(initial: T) -> Self {
        Self {
            old_state: initial.clone(),
            new_state: initial,
            is_diff_mode: false,
            patches: Vec::new(),
        }
    }
}

impl<T> DiffState<T> {
    /// Value a host should display under `mode`
    pub fn clean_state(&self, mode: DiffMode) -> &T {
        match mode {
            DiffMode::DefaultAccept => &self.new_state,
            DiffMode::HoldAccept => &self.old_state,
        }
    }
}

/// Maximum number of snapshots kept on a key's history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryLimit {
    #[default]
    Unbounded,
    /// Oldest snapshots are evicted once this many are held
    Bounded(NonZeroUsize),
}

impl HistoryLimit {
    /// `None` and `Some(0)` both mean unbounded
    pub fn from_option(limit: Option<usize>) -> Self {
        limit
            .and_then(NonZeroUsize::new)
            .map_or(HistoryLimit::Unbounded, HistoryLimit::Bounded)
    }

    pub fn max(&self) -> Option<usize> {
        match self {
            HistoryLimit::Unbounded => None,
            HistoryLimit::Bounded(n) => Some(n.get()),
        }
    }
}
