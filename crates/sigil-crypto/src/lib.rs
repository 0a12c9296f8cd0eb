//! Hashing primitives for Sigil.
//!
//! Everywhere identity matters — content addressing, seed verification,
//! pattern fingerprints — the same deterministic, domain-separated BLAKE3
//! hashing is used. See [`ContentHasher`].

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
