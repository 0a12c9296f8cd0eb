use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of bytes kept when a [`ContentHash`] is truncated for wire use.
pub const PREFIX_BYTES: usize = 8;

/// Number of hex digits in the rendered form of a [`HashPrefix`].
pub const PREFIX_HEX_LEN: usize = PREFIX_BYTES * 2;

/// Content-addressed identifier for any stored content.
///
/// A `ContentHash` is the BLAKE3 hash of a piece of content. Identical
/// content always produces the same `ContentHash`, making content
/// deduplicatable and reconstructions verifiable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute a `ContentHash` from raw bytes (no domain separation; see
    /// `sigil-crypto` for the domain-separated hashers used for identity).
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a `ContentHash` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The null hash (all zeros). Represents "no content".
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null hash.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The fixed-width wire truncation of this hash.
    pub fn prefix(&self) -> HashPrefix {
        let mut arr = [0u8; PREFIX_BYTES];
        arr.copy_from_slice(&self.0[..PREFIX_BYTES]);
        HashPrefix(arr)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ContentHash> for [u8; 32] {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

/// The first [`PREFIX_BYTES`] bytes of a [`ContentHash`].
///
/// Compact wire formats carry a `HashPrefix` instead of the full digest:
/// 8 bytes, rendered as 16 hex digits. This is a documented compactness
/// trade-off, not a security mechanism — a prefix match says the
/// reconstruction is almost certainly intact, a mismatch says it is
/// definitely not.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashPrefix([u8; PREFIX_BYTES]);

impl HashPrefix {
    /// Create from raw prefix bytes.
    pub fn from_raw(bytes: [u8; PREFIX_BYTES]) -> Self {
        Self(bytes)
    }

    /// Parse from a 16-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != PREFIX_BYTES {
            return Err(TypeError::InvalidLength {
                expected: PREFIX_BYTES,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; PREFIX_BYTES];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Hex-encoded string representation (16 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw prefix bytes.
    pub fn as_bytes(&self) -> &[u8; PREFIX_BYTES] {
        &self.0
    }

    /// Returns `true` if this prefix matches the given full hash.
    pub fn matches(&self, hash: &ContentHash) -> bool {
        *self == hash.prefix()
    }
}

impl fmt::Debug for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashPrefix({})", self.to_hex())
    }
}

impl fmt::Display for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<&ContentHash> for HashPrefix {
    fn from(hash: &ContentHash) -> Self {
        hash.prefix()
    }
}
