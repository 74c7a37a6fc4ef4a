//! Patch wire types.
//!
//! A [`Patch`] is one RFC-6902-style structural edit. Serialized as
//! `{"op": "add"|"remove"|"replace", "path": "...", "value": ...}`; `remove`
//! carries no `value`.

use crate::errors::{DiffStateError, Result};
use json_patch::jsonptr::{Pointer, PointerBuf};
use json_patch::{AddOperation, PatchOperation, RemoveOperation, ReplaceOperation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operation name of a [`Patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        }
    }
}

/// A single structural edit addressed by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Patch {
    /// Insert `value` at `path` (object member or array position)
    Add { path: String, value: Value },
    /// Delete whatever sits at `path`
    Remove { path: String },
    /// Overwrite the existing value at `path`
    Replace { path: String, value: Value },
}

impl Patch {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Patch::Add {
            path: path.into(),
            value,
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Patch::Remove { path: path.into() }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Patch::Replace {
            path: path.into(),
            value,
        }
    }

    pub fn op(&self) -> PatchOp {
        match self {
            Patch::Add { .. } => PatchOp::Add,
            Patch::Remove { .. } => PatchOp::Remove,
            Patch::Replace { .. } => PatchOp::Replace,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Patch::Add { path, .. } | Patch::Remove { path } | Patch::Replace { path, .. } => path,
        }
    }

    /// Payload of `add`/`replace`; `None` for `remove`
    pub fn value(&self) -> Option<&Value> {
        match self {
            Patch::Add { value, .. } | Patch::Replace { value, .. } => Some(value),
            Patch::Remove { .. } => None,
        }
    }

    /// Convert into the `json_patch` operation it denotes.
    ///
    /// # Errors
    ///
    /// `InvalidPath` when `path` is not a well-formed JSON pointer.
    pub fn to_operation(&self) -> Result<PatchOperation> {
        let path = parse_pointer(self.path())?;
        Ok(match self {
            Patch::Add { value, .. } => PatchOperation::Add(AddOperation {
                path,
                value: value.clone(),
            }),
            Patch::Remove { .. } => PatchOperation::Remove(RemoveOperation { path }),
            Patch::Replace { value, .. } => PatchOperation::Replace(ReplaceOperation {
                path,
                value: value.clone(),
            }),
        })
    }
}

fn parse_pointer(path: &str) -> Result<PointerBuf> {
    Pointer::parse(path)
        .map(Pointer::to_buf)
        .map_err(|err| DiffStateError::InvalidPath {
            path: path.to_string(),
            reason: err.to_string(),
        })
}
