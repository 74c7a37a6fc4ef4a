use thiserror::Error;

/// Result type alias using DiffStateError
pub type Result<T> = std::result::Result<T, DiffStateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and host-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registry
    NotFound,
    AlreadyExists,

    // Transition preconditions
    NotInDiffMode,
    HistoryEmpty,
    RedoEmpty,

    // Patch paths
    InvalidPath,

    // Configuration / IO
    InvalidConfig,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotInDiffMode => "ERR_NOT_IN_DIFF_MODE",
            ExErrorKind::HistoryEmpty => "ERR_HISTORY_EMPTY",
            ExErrorKind::RedoEmpty => "ERR_REDO_EMPTY",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for refusals: the registry logs these as `end_rejected` and its
    /// boolean surface reports them as `false`. Anything else is a fault.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExErrorKind::NotFound
                | ExErrorKind::AlreadyExists
                | ExErrorKind::NotInDiffMode
                | ExErrorKind::HistoryEmpty
                | ExErrorKind::RedoEmpty
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// (operation, registry key, patch path) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add registry key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add patch path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the registry key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the patch path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for diff-state operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffStateError {
    // ===== Registry Errors =====
    /// No entry is registered under the key
    #[error("State key not registered: {key}")]
    KeyNotFound { key: String },

    /// An entry is already registered under the key
    #[error("State key already registered: {key}")]
    KeyAlreadyRegistered { key: String },

    // ===== Transition Errors =====
    /// Accept/reject requested while no proposal is pending
    #[error("No pending diff for key: {key}")]
    NotInDiffMode { key: String },

    /// Undo requested with an empty history stack
    #[error("Nothing to undo for key: {key}")]
    HistoryEmpty { key: String },

    /// Redo requested with an empty redo stack
    #[error("Nothing to redo for key: {key}")]
    RedoEmpty { key: String },

    // ===== Patch Errors =====
    /// A patch path could not be resolved against the target value
    #[error("Invalid patch path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // ===== Boundary Errors =====
    /// A typed value could not be converted to or from JSON
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Engine configuration failed to parse or validate
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Reading a configuration file failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl DiffStateError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DiffStateError::KeyNotFound { .. } => ExErrorKind::NotFound,
            DiffStateError::KeyAlreadyRegistered { .. } => ExErrorKind::AlreadyExists,
            DiffStateError::NotInDiffMode { .. } => ExErrorKind::NotInDiffMode,
            DiffStateError::HistoryEmpty { .. } => ExErrorKind::HistoryEmpty,
            DiffStateError::RedoEmpty { .. } => ExErrorKind::RedoEmpty,
            DiffStateError::InvalidPath { .. } => ExErrorKind::InvalidPath,
            DiffStateError::Serialization { .. } => ExErrorKind::Serialization,
            DiffStateError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            DiffStateError::Io { .. } => ExErrorKind::Io,
        }
    }
}

/// Conversion from DiffStateError to ExError
impl From<DiffStateError> for ExError {
    fn from(err: DiffStateError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            DiffStateError::KeyNotFound { key }
            | DiffStateError::KeyAlreadyRegistered { key }
            | DiffStateError::NotInDiffMode { key }
            | DiffStateError::HistoryEmpty { key }
            | DiffStateError::RedoEmpty { key } => {
                ExError::new(kind).with_key(key).with_message(message)
            }

            DiffStateError::InvalidPath { path, .. } => {
                ExError::new(kind).with_path(path).with_message(message)
            }

            DiffStateError::Serialization { .. }
            | DiffStateError::InvalidConfig { .. }
            | DiffStateError::Io { .. } => ExError::new(kind).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to DiffStateError
impl From<serde_json::Error> for DiffStateError {
    fn from(err: serde_json::Error) -> Self {
        DiffStateError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to DiffStateError
impl From<toml::de::Error> for DiffStateError {
    fn from(err: toml::de::Error) -> Self {
        DiffStateError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
