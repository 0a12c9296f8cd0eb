use sigil_types::ContentHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"sigil-content-v1"`,
/// `"sigil-pattern-v1"`) that is prepended to every hash computation. This
/// prevents cross-type hash collisions: a content blob and a pattern
/// fingerprint over identical bytes produce different hashes.
///
/// [`ContentHasher::CONTENT`] is the canonical hasher for content identity.
/// The encoder, the content store, and the program executor all hash content
/// bytes through it, so a hash computed at encode time is directly comparable
/// to a hash computed at store or verify time.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for content bytes (encode/decode verification, store keys,
    /// program `verify` trailers).
    pub const CONTENT: Self = Self {
        domain: "sigil-content-v1",
    };
    /// Hasher for pattern fingerprints (registry record integrity).
    pub const PATTERN: Self = Self {
        domain: "sigil-pattern-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ContentHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
