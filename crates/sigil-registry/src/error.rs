/// Errors from pattern registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The requested pattern id is not registered.
    #[error("pattern not found: {0}")]
    NotFound(String),

    /// The pattern's template and slot list disagree.
    #[error("invalid pattern {id}: {reason}")]
    InvalidPattern { id: String, reason: String },

    /// The pattern id violates naming rules.
    #[error("invalid pattern id {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The template text itself is malformed (unbalanced or empty braces).
    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    /// A slot required by the template has no anchor value.
    #[error("missing slot: {0}")]
    MissingSlot(String),

    /// A persisted pattern record could not be decoded or failed its
    /// fingerprint check.
    #[error("corrupt pattern record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
