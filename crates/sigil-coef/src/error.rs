use sigil_registry::RegistryError;
use sigil_store::StoreError;

/// Errors from COEF parsing and execution.
#[derive(Debug, thiserror::Error)]
pub enum CoefError {
    /// The wire text could not be parsed.
    #[error("malformed wire format: {0}")]
    MalformedWire(String),

    /// The verb is not part of the COEF vocabulary.
    #[error("unknown op: {0}")]
    UnknownOp(String),

    /// An instruction is missing a required argument.
    #[error("{op} requires argument {arg:?}")]
    MissingArg { op: String, arg: String },

    /// An instruction referenced a binding or store key that resolves to
    /// nothing.
    #[error("unresolved reference: {0}")]
    Unresolved(String),

    /// An instruction needs a current value but none has been produced yet.
    #[error("{op} needs a current value; none has been produced")]
    NoCurrentValue { op: String },

    /// The `regex` verb was given an invalid expression.
    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    /// The final value's hash does not match the `verify` trailer.
    #[error("verification failed: expected {expected}, computed {computed}")]
    Verification { expected: String, computed: String },

    /// Registry failure during execution.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Store failure during execution.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for COEF operations.
pub type CoefResult<T> = Result<T, CoefError>;
