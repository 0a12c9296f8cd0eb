//! Seed codec for Sigil.
//!
//! A [`Seed`] is the compact, lossless reference that stands in for a piece
//! of content: a pattern id, the anchor values that vary, and a truncated
//! hash of the original bytes. [`SeedCodec`] encodes content into Seeds and
//! reconstructs it back, verifying the reconstruction against the recorded
//! hash. This is barcode, not approximation: content that matches no
//! registered pattern cannot be encoded, and a reconstruction either hashes
//! back exactly or is flagged lossy.

pub mod codec;
pub mod error;
pub mod extract;
pub mod seed;
pub mod wire;

pub use codec::{DecodeResult, SeedCodec};
pub use error::{CodecError, CodecResult};
pub use extract::extract_anchors;
pub use seed::Seed;
