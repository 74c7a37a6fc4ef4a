//! Patch application.
//!
//! Each [`Patch`] is converted to a `json_patch` operation and applied in
//! order. [`apply_patches`] works on a copy, so a failing list leaves the
//! input untouched.

use crate::diff::model::Patch;
use crate::errors::{DiffStateError, Result};
use serde_json::Value;

/// Apply `patches` to a copy of `target` and return the result.
///
/// # Errors
///
/// `InvalidPath` if any patch addresses a location that does not exist (or,
/// for `add`, whose parent does not exist), removes the document root, or
/// carries a malformed pointer.
pub fn apply_patches(target: &Value, patches: &[Patch]) -> Result<Value> {
    let mut doc = target.clone();
    for patch in patches {
        apply_patch_mut(&mut doc, patch)?;
    }
    Ok(doc)
}

/// Apply a single patch in place.
///
/// # Errors
///
/// See [`apply_patches`]. On error `doc` is unchanged.
pub fn apply_patch_mut(doc: &mut Value, patch: &Patch) -> Result<()> {
    let operation = patch.to_operation()?;
    json_patch::patch(doc, std::slice::from_ref(&operation)).map_err(|err| {
        DiffStateError::InvalidPath {
            path: patch.path().to_string(),
            reason: err.to_string(),
        }
    })
}
