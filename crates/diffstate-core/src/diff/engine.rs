//! Structural patch computation.
//!
//! The core entry point is [`compute_patches`], which walks two JSON values
//! in lockstep and emits the edits that turn the first into the second.

use crate::diff::model::Patch;
use json_patch::jsonptr::{PointerBuf, Token};
use serde_json::Value;

/// Compute an ordered patch list transforming `old` into `new`.
///
/// Traversal rules:
/// - equal values produce nothing;
/// - objects are compared key by key in map iteration order: keys missing
///   from `new` are removed, shared keys are recursed into, then keys only in
///   `new` are added;
/// - arrays are compared by position: the common prefix is recursed into,
///   surplus new items are added in ascending index order and surplus old
///   items removed in descending index order;
/// - anything else (scalar change, shape mismatch) becomes a single
///   `replace` at the current path, which is `""` at the root.
///
/// Applying the result in order with [`crate::diff::apply_patches`] yields
/// `new` exactly.
pub fn compute_patches(old: &Value, new: &Value) -> Vec<Patch> {
    let mut patches = Vec::new();
    diff_values(old, new, &PointerBuf::root(), &mut patches);
    patches
}

fn diff_values(old: &Value, new: &Value, path: &PointerBuf, out: &mut Vec<Patch>) {
    if old == new {
        return;
    }

    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_child) in old_map {
                let child_path = child(path, key.as_str());
                match new_map.get(key) {
                    Some(new_child) => diff_values(old_child, new_child, &child_path, out),
                    None => out.push(Patch::remove(child_path.as_str())),
                }
            }
            for (key, new_child) in new_map {
                if !old_map.contains_key(key) {
                    out.push(Patch::add(child(path, key.as_str()).as_str(), new_child.clone()));
                }
            }
        }
        (Value::Array(old_items), Value::Array(new_items)) => {
            let common = old_items.len().min(new_items.len());
            for (index, (old_child, new_child)) in
                old_items.iter().zip(new_items.iter()).enumerate()
            {
                diff_values(old_child, new_child, &child(path, index), out);
            }
            for (index, new_child) in new_items.iter().enumerate().skip(common) {
                out.push(Patch::add(child(path, index).as_str(), new_child.clone()));
            }
            for index in (common..old_items.len()).rev() {
                out.push(Patch::remove(child(path, index).as_str()));
            }
        }
        _ => out.push(Patch::replace(path.as_str(), new.clone())),
    }
}

fn child<'t>(base: &PointerBuf, token: impl Into<Token<'t>>) -> PointerBuf {
    let mut path = base.clone();
    path.push_back(token);
    path
}
