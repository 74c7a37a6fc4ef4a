//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log registry
//! operations. Field names come from `diffstate_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use diffstate_core::log_op_start;
/// log_op_start!("set_diff_state");
/// log_op_start!("set_diff_state", key = "counter");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use diffstate_core::log_op_end;
/// log_op_end!("undo", duration_ms = 0);
/// log_op_end!("undo", duration_ms = 0, key = "counter", history_len = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that was refused because a precondition did not hold
///
/// Missing keys are reported at `warn`; empty stacks and absent proposals at
/// `debug`, since hosts routinely probe them.
///
/// # Example
///
/// ```
/// # use diffstate_core::{log_op_rejected, errors::DiffStateError};
/// let err = DiffStateError::HistoryEmpty { key: "counter".to_string() };
/// log_op_rejected!("undo", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_rejected {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.kind() == $crate::errors::ExErrorKind::NotFound {
            $crate::__tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::__schema::EVENT_END_REJECTED,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                key = ex_err.key().unwrap_or_default(),
            );
        } else {
            $crate::__tracing::debug!(
                component = module_path!(),
                op = $op,
                event = $crate::__schema::EVENT_END_REJECTED,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                key = ex_err.key().unwrap_or_default(),
            );
        }
    }};
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use diffstate_core::{log_op_error, errors::DiffStateError};
/// let err = DiffStateError::InvalidConfig { reason: "history_limit = 0".to_string() };
/// log_op_error!("load_config", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
