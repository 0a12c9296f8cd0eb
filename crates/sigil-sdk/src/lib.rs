//! High-level SDK for Sigil.
//!
//! Provides a unified API over the pattern registry, content store, seed
//! codec, and COEF executor. This is the main entry point for applications
//! embedding Sigil: hand it a storage root (or run in memory), then
//! encode/decode seeds, store/resolve content, and run COEF programs.

pub mod config;
pub mod error;
pub mod workspace;

pub use config::SigilConfig;
pub use error::{SdkError, SdkResult};
pub use workspace::Sigil;

// Re-export key types
pub use sigil_codec::{DecodeResult, Seed};
pub use sigil_coef::{CoefInstruction, CoefOp, CoefProgram, ExecOutcome};
pub use sigil_registry::Pattern;
pub use sigil_types::{ContentHash, HashPrefix};
