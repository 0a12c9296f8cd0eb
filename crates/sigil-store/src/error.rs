/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No stored entry matches the given key.
    #[error("no entry matches key: {0}")]
    NotFound(String),

    /// A hash prefix matches more than one stored entry.
    #[error("ambiguous prefix {prefix}: matches {count} entries")]
    AmbiguousPrefix { prefix: String, count: usize },

    /// The key cannot be used for lookup (e.g., a hex prefix shorter than
    /// the minimum length).
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The alias name violates naming rules.
    #[error("invalid alias {name:?}: {reason}")]
    InvalidAlias { name: String, reason: String },

    /// Content read back from storage no longer matches its hash.
    #[error("corrupt entry {hash}: {reason}")]
    CorruptEntry { hash: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
