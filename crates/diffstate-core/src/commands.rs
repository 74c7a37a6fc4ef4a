//! Command inventory for the `apply()` boundary
//!
//! Every registry mutation has a command form, so hosts can queue, log or
//! replay operations as data. Commands serialize as internally tagged JSON:
//!
//! ```json
//! {"type": "setState", "key": "counter", "value": {"count": 1}, "isDiffChange": true}
//! ```

use crate::model::DiffMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single registry mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Register a key with its initial value (default strategy). Without a
    /// `diffMode` the registry's configured default applies.
    #[serde(rename_all = "camelCase")]
    Register {
        key: String,
        initial: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        diff_mode: Option<DiffMode>,
    },

    /// Record a new value, optionally as a diff proposal
    #[serde(rename_all = "camelCase")]
    SetState {
        key: String,
        value: Value,
        #[serde(default)]
        is_diff_change: bool,
    },

    AcceptAll { key: String },

    RejectAll { key: String },

    Undo { key: String },

    Redo { key: String },

    /// Drop the key and its history
    Remove { key: String },
}

impl Command {
    /// Key the command targets
    pub fn key(&self) -> &str {
        match self {
            Command::Register { key, .. }
            | Command::SetState { key, .. }
            | Command::AcceptAll { key }
            | Command::RejectAll { key }
            | Command::Undo { key }
            | Command::Redo { key }
            | Command::Remove { key } => key,
        }
    }
}
