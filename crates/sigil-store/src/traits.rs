use sigil_types::ContentHash;

use crate::error::StoreResult;

/// Content-addressable store.
///
/// All implementations must satisfy these invariants:
/// - Entries are immutable once written. Content-addressing guarantees
///   this: the same bytes always produce the same hash.
/// - `store` is idempotent: storing the same bytes twice yields the same
///   hash and does not duplicate storage.
/// - Key resolution follows the order documented in [`crate::key`]; a
///   prefix matching more than one entry is an error, never a silent pick.
/// - Aliases are mutable (last writer wins); hash-keyed data is not.
/// - All I/O errors are propagated, never silently ignored.
pub trait ContentStore: Send + Sync {
    /// Store content and return its hash. Optionally registers `alias` for
    /// the resulting hash.
    fn store(&self, content: &[u8], alias: Option<&str>) -> StoreResult<ContentHash>;

    /// Resolve a key (full hash, unambiguous prefix, or alias) to the hash
    /// it names. Fails with `NotFound` if nothing matches and
    /// `AmbiguousPrefix` if a prefix matches more than one entry.
    fn resolve_key(&self, key: &str) -> StoreResult<ContentHash>;

    /// Resolve a key to the stored content.
    fn resolve(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Check whether a key resolves to a stored entry.
    ///
    /// Returns `Ok(false)` for a key that matches nothing; an ambiguous
    /// prefix is still an error.
    fn has(&self, key: &str) -> StoreResult<bool> {
        match self.resolve_key(key) {
            Ok(_) => Ok(true),
            Err(crate::error::StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Register `name` as an alias for an already-stored hash.
    ///
    /// Fails with `NotFound` if the hash has no entry. Re-aliasing an
    /// existing name re-points it (last writer wins).
    fn alias(&self, name: &str, hash: &ContentHash) -> StoreResult<()>;

    /// All registered aliases as `(name, hash)` pairs, sorted by name.
    fn aliases(&self) -> StoreResult<Vec<(String, ContentHash)>>;
}
