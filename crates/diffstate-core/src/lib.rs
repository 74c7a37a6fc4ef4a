//! DiffState Core - keyed state with diff proposals and undo/redo
//!
//! This crate provides an in-memory engine that tracks named pieces of
//! application state, including:
//! - JSON-Patch style structural diffs between a baseline and a proposal
//! - Diff mode: propose a change, then accept or reject it as a whole
//! - Per-key undo/redo history with optional bounding
//! - Identity-based reconciliation of object arrays (added/changed/removed markers)
//! - A command boundary (`apply`) with typed errors and change notifications

pub mod apply;
pub mod commands;
pub mod config;
pub mod diff;
pub mod errors;
pub mod events;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod strategy;

#[doc(hidden)]
pub use diffstate_core_types::schema as __schema;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use apply::apply;
pub use commands::Command;
pub use config::EngineConfig;
pub use diff::{
    add_diff_to_array_objs, apply_patches, compute_patches, reconcile, DiffMarker, Patch, PatchOp,
    ReconcileOptions, RemovedPolicy,
};
pub use errors::{DiffStateError, ExError, ExErrorKind, Result};
pub use events::{ChangeEvent, Transition};
pub use history::DiffHistoryState;
pub use model::{DiffMode, DiffState, HistoryLimit};
pub use registry::{RegisterOptions, Registry};
pub use strategy::{ArrayReconcileStrategy, ComputeState, Computed, JsonPatchStrategy, SerdePatchStrategy};
