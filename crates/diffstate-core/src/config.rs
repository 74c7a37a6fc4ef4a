//! Engine configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! history_limit = 100
//! default_diff_mode = "holdAccept"
//! log_profile = "production"
//!
//! [reconcile]
//! id_field = "id"
//! diff_path = ""
//! marker_field = "diff"
//! removed = "drop"
//! ```

use crate::diff::ReconcileOptions;
use crate::errors::{DiffStateError, Result};
use crate::logging_facility::Profile;
use crate::model::{DiffMode, HistoryLimit};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

pub const OP_LOAD_CONFIG: &str = "load_config";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum history snapshots per key; absent means unbounded
    pub history_limit: Option<usize>,
    /// Diff mode applied by `RegisterOptions::from_config`
    pub default_diff_mode: DiffMode,
    /// Logging profile a host should pass to `logging_facility::init`
    pub log_profile: Profile,
    /// Defaults for array reconciliation strategies
    pub reconcile: ReconcileOptions,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the document does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let started = Instant::now();
        let path_str = path.display().to_string();
        log_op_start!(OP_LOAD_CONFIG, path = path_str.as_str());

        let result = fs::read_to_string(path)
            .map_err(|e| DiffStateError::Io {
                message: format!("failed to read config {}: {}", path_str, e),
            })
            .and_then(|content| Self::from_toml_str(&content));

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(OP_LOAD_CONFIG, duration_ms = duration_ms, path = path_str.as_str());
            }
            Err(err) => {
                log_op_error!(
                    OP_LOAD_CONFIG,
                    err.clone(),
                    duration_ms = duration_ms,
                    path = path_str.as_str()
                );
            }
        }
        result
    }

    /// Check field constraints
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `history_limit` is zero or `reconcile.id_field` /
    /// `reconcile.marker_field` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == Some(0) {
            return Err(DiffStateError::InvalidConfig {
                reason: "history_limit must be at least 1 (omit it for unbounded history)"
                    .to_string(),
            });
        }
        if self.reconcile.id_field.trim().is_empty() {
            return Err(DiffStateError::InvalidConfig {
                reason: "reconcile.id_field cannot be empty".to_string(),
            });
        }
        if self.reconcile.marker_field.trim().is_empty() {
            return Err(DiffStateError::InvalidConfig {
                reason: "reconcile.marker_field cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn history_limit(&self) -> HistoryLimit {
        HistoryLimit::from_option(self.history_limit)
    }
}
