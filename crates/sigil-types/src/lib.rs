//! Foundation types for Sigil.
//!
//! This crate provides the identity types used throughout the Sigil system.
//! Every other sigil crate depends on `sigil-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Content-addressed identifier (BLAKE3 hash)
//! - [`HashPrefix`] — Fixed-width truncation of a [`ContentHash`] used by the
//!   compact wire formats
//! - [`wire`] — Percent-escaping shared by the line-oriented wire formats

pub mod error;
pub mod hash;
pub mod wire;

pub use error::TypeError;
pub use hash::{ContentHash, HashPrefix};
