//! Pluggable patch strategies
//!
//! A [`ComputeState`] strategy is supplied at registration and consulted
//! whenever a key's patches are recomputed. It receives the frozen baseline
//! and the incoming value, and returns the value to store together with the
//! patches that turn the baseline into it. Strategies may rewrite the
//! incoming value (e.g. annotate array items) but must keep the two outputs
//! consistent.

use crate::diff::{add_diff_to_array_objs, compute_patches, Patch, ReconcileOptions};
use serde::Serialize;
use serde_json::Value;

/// Output of a [`ComputeState`] strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<T> {
    /// Value to store as `new_state`
    pub new_state: T,
    /// Patches transforming the baseline into `new_state`
    pub patches: Vec<Patch>,
}

/// Registration-time diffing policy for one key.
pub trait ComputeState<T>: Send + Sync {
    fn compute(&self, old_state: &T, new_state: T) -> Computed<T>;
}

impl<T, F> ComputeState<T> for F
where
    F: Fn(&T, T) -> Computed<T> + Send + Sync,
{
    fn compute(&self, old_state: &T, new_state: T) -> Computed<T> {
        self(old_state, new_state)
    }
}

/// Default strategy: positional structural diff, value stored as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPatchStrategy;

impl ComputeState<Value> for JsonPatchStrategy {
    fn compute(&self, old_state: &Value, new_state: Value) -> Computed<Value> {
        let patches = compute_patches(old_state, &new_state);
        Computed { new_state, patches }
    }
}

/// Structural diff for any serializable type.
///
/// Both sides are serialized to JSON and diffed. A value that fails to
/// serialize yields no patches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdePatchStrategy;

impl<T: Serialize> ComputeState<T> for SerdePatchStrategy {
    fn compute(&self, old_state: &T, new_state: T) -> Computed<T> {
        let patches = match (serde_json::to_value(old_state), serde_json::to_value(&new_state)) {
            (Ok(old), Ok(new)) => compute_patches(&old, &new),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(error = %err, "state is not serializable; patches left empty");
                Vec::new()
            }
        };
        Computed { new_state, patches }
    }
}

/// Reconcile the array at `items_path` before diffing.
///
/// The array found at `items_path` in the incoming value is annotated
/// against the array at the same location in the baseline; a baseline without
/// an array there counts as empty. Patches are then computed against the
/// annotated value.
///
/// `items_path` is read like the reconciler's `diff_path`: `/`-separated
/// segments with empty segments ignored, so `"rows"`, `"/rows"` and
/// `"rows/"` all address the same member and `""` is the root. Segments use
/// JSON pointer escaping (`~0`, `~1`).
#[derive(Debug, Clone, Default)]
pub struct ArrayReconcileStrategy {
    items_path: String,
    options: ReconcileOptions,
}

impl ArrayReconcileStrategy {
    pub fn new(items_path: impl AsRef<str>, options: ReconcileOptions) -> Self {
        Self {
            items_path: normalize_items_path(items_path.as_ref()),
            options,
        }
    }

    pub fn items_path(&self) -> &str {
        &self.items_path
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }
}

impl ComputeState<Value> for ArrayReconcileStrategy {
    fn compute(&self, old_state: &Value, mut new_state: Value) -> Computed<Value> {
        let old_items = old_state
            .pointer(&self.items_path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match new_state.pointer_mut(&self.items_path) {
            Some(Value::Array(new_items)) => {
                *new_items = add_diff_to_array_objs(old_items, new_items, &self.options);
            }
            _ => tracing::warn!(
                items_path = %self.items_path,
                "no array at items path; value stored without markers"
            ),
        }
        let patches = compute_patches(old_state, &new_state);
        Computed { new_state, patches }
    }
}

fn normalize_items_path(items_path: &str) -> String {
    items_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
}
