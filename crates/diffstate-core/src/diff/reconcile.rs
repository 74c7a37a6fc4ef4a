//! Array item reconciliation.
//!
//! [`add_diff_to_array_objs`] matches the items of a new array against an old
//! one by an identity field and annotates each new item with a marker:
//! `"added"` when no old item shares its identity, `"changed"` when the
//! matched item differs in anything other than the marker itself. Identical
//! items come back unmarked, with any stale marker cleared.
//!
//! The marker is written at `diff_path`: on the item itself when empty,
//! otherwise on the nested object reached by the slash-delimited path (e.g.
//! `/data` puts it at `item.data.diff`). Missing intermediate objects are
//! created; sibling fields are never touched. An item whose path runs into a
//! non-object value is returned unannotated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker written onto reconciled items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMarker {
    Added,
    Changed,
    Removed,
}

impl DiffMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMarker::Added => "added",
            DiffMarker::Changed => "changed",
            DiffMarker::Removed => "removed",
        }
    }
}

/// What to do with old items that have no counterpart in the new array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovedPolicy {
    /// Leave them out of the result
    #[default]
    Drop,
    /// Append them after the new items, marked `"removed"`, in old order
    Retain,
}

/// Reconciler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Field holding each item's identity
    pub id_field: String,
    /// Slash-delimited location of the marker object, `""` for the item itself
    pub diff_path: String,
    /// Name of the marker field
    pub marker_field: String,
    /// Handling of old items absent from the new array
    pub removed: RemovedPolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            diff_path: String::new(),
            marker_field: "diff".to_string(),
            removed: RemovedPolicy::Drop,
        }
    }
}

impl ReconcileOptions {
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_diff_path(mut self, diff_path: impl Into<String>) -> Self {
        self.diff_path = diff_path.into();
        self
    }

    pub fn with_marker_field(mut self, marker_field: impl Into<String>) -> Self {
        self.marker_field = marker_field.into();
        self
    }

    pub fn with_removed(mut self, removed: RemovedPolicy) -> Self {
        self.removed = removed;
        self
    }

    fn segments(&self) -> Vec<&str> {
        self.diff_path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Annotate `new` items against `old` with the default marker field and
/// removed-item policy.
pub fn reconcile(old: &[Value], new: &[Value], id_field: &str, diff_path: &str) -> Vec<Value> {
    let options = ReconcileOptions::default()
        .with_id_field(id_field)
        .with_diff_path(diff_path);
    add_diff_to_array_objs(old, new, &options)
}

/// Annotate `new` items against `old`. Neither input is modified.
pub fn add_diff_to_array_objs(
    old: &[Value],
    new: &[Value],
    options: &ReconcileOptions,
) -> Vec<Value> {
    let segments = options.segments();
    let id_of = |item: &Value| item.get(&options.id_field).cloned();

    let mut result: Vec<Value> = new
        .iter()
        .map(|item| {
            if !item.is_object() {
                return item.clone();
            }
            let id = id_of(item);
            let matched = id
                .as_ref()
                .and_then(|id| old.iter().find(|o| o.get(&options.id_field) == Some(id)));
            match matched {
                None => with_marker(item, &segments, options, Some(DiffMarker::Added)),
                Some(previous) => {
                    let unchanged = without_marker(item, &segments, &options.marker_field)
                        == without_marker(previous, &segments, &options.marker_field);
                    let marker = (!unchanged).then_some(DiffMarker::Changed);
                    with_marker(item, &segments, options, marker)
                }
            }
        })
        .collect();

    if options.removed == RemovedPolicy::Retain {
        for previous in old {
            let Some(id) = id_of(previous) else {
                continue;
            };
            if !new.iter().any(|item| id_of(item).as_ref() == Some(&id)) {
                result.push(with_marker(
                    previous,
                    &segments,
                    options,
                    Some(DiffMarker::Removed),
                ));
            }
        }
    }

    result
}

/// Copy of `item` with the marker set to `marker`, or cleared when `None`.
fn with_marker(
    item: &Value,
    segments: &[&str],
    options: &ReconcileOptions,
    marker: Option<DiffMarker>,
) -> Value {
    let Some(marker) = marker else {
        return without_marker(item, segments, &options.marker_field);
    };

    let mut annotated = item.clone();
    let mut current = &mut annotated;
    for segment in segments {
        current = match current {
            Value::Object(map) => {
                let slot = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                slot
            }
            _ => return item.clone(),
        };
    }
    match current {
        Value::Object(map) => {
            map.insert(
                options.marker_field.clone(),
                Value::String(marker.as_str().to_string()),
            );
            annotated
        }
        _ => item.clone(),
    }
}

/// Copy of `item` with the marker removed. A nested marker object left empty
/// by the removal is pruned as well.
fn without_marker(item: &Value, segments: &[&str], marker_field: &str) -> Value {
    let mut stripped = item.clone();
    strip(&mut stripped, segments, marker_field);
    stripped
}

fn strip(value: &mut Value, segments: &[&str], marker_field: &str) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    match segments.split_first() {
        None => map.remove(marker_field).is_some(),
        Some((head, rest)) => {
            let Some(child) = map.get_mut(*head) else {
                return false;
            };
            let removed = strip(child, rest, marker_field);
            if removed && child.as_object().is_some_and(Map::is_empty) {
                map.remove(*head);
            }
            removed
        }
    }
}
