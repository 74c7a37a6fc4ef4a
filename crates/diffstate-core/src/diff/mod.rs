//! Structural diffing.
//!
//! Pure functions shared by the state engine and by hosts:
//!
//! - [`compute_patches`]: ordered RFC-6902-style patches between two values
//! - [`apply_patches`]: replay a patch list onto a value
//! - [`add_diff_to_array_objs`] / [`reconcile`]: mark array items as
//!   added/changed by identity
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical patch lists.
//! - **Replayability**: `apply_patches(a, &compute_patches(a, b)) == b`.
//! - **Non-mutation**: inputs are never modified; results are fresh values.

pub mod apply;
pub mod engine;
pub mod model;
pub mod reconcile;

pub use apply::{apply_patch_mut, apply_patches};
pub use engine::compute_patches;
pub use model::{Patch, PatchOp};
pub use reconcile::{add_diff_to_array_objs, reconcile, DiffMarker, ReconcileOptions, RemovedPolicy};
