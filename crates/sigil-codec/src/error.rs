use sigil_registry::RegistryError;

/// Errors from codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The seed references a pattern id the registry does not know.
    #[error("pattern not found: {0}")]
    PatternNotFound(String),

    /// An anchor required by the pattern's slots is absent.
    #[error("missing slot: {0}")]
    MissingSlot(String),

    /// An anchor was supplied that no slot of the pattern declares.
    #[error("anchor {anchor:?} does not name a slot of pattern {pattern_id}")]
    UnknownAnchor { anchor: String, pattern_id: String },

    /// The compact wire text could not be parsed.
    #[error("malformed wire format: {0}")]
    MalformedWire(String),

    /// Automatic anchor extraction could not reproduce the content.
    #[error("anchor extraction failed for pattern {pattern_id}: {reason}")]
    ExtractionFailed { pattern_id: String, reason: String },

    /// Any other registry failure (storage, validation).
    #[error("registry error: {0}")]
    Registry(RegistryError),
}

impl From<RegistryError> for CodecError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => Self::PatternNotFound(id),
            RegistryError::MissingSlot(slot) => Self::MissingSlot(slot),
            other => Self::Registry(other),
        }
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
