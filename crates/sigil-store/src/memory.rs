//! In-memory content store for testing and ephemeral use.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use sigil_crypto::ContentHasher;
use sigil_types::ContentHash;

use crate::error::{StoreError, StoreResult};
use crate::key::{is_hex, validate_alias, MIN_PREFIX_LEN};
use crate::traits::ContentStore;

/// An in-memory implementation of [`ContentStore`].
///
/// All data lives behind `RwLock`s and is lost when the store is dropped.
pub struct InMemoryContentStore {
    objects: RwLock<HashMap<ContentHash, Vec<u8>>>,
    aliases: RwLock<BTreeMap<String, ContentHash>>,
}

impl InMemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            aliases: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entries (aliases not counted).
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored entries.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    fn lookup_prefix(&self, prefix: &str) -> StoreResult<ContentHash> {
        let needle = prefix.to_ascii_lowercase();
        let objects = self.objects.read().expect("lock poisoned");
        let mut matches = objects.keys().filter(|h| h.to_hex().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(hash), None) => Ok(*hash),
            (Some(_), Some(_)) => {
                let count = objects
                    .keys()
                    .filter(|h| h.to_hex().starts_with(&needle))
                    .count();
                Err(StoreError::AmbiguousPrefix {
                    prefix: prefix.to_string(),
                    count,
                })
            }
            (None, _) => Err(StoreError::NotFound(prefix.to_string())),
        }
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryContentStore {
    fn store(&self, content: &[u8], alias: Option<&str>) -> StoreResult<ContentHash> {
        let hash = ContentHasher::CONTENT.hash(content);
        {
            let mut objects = self.objects.write().expect("lock poisoned");
            // Idempotent: same bytes, same hash, one entry.
            objects.entry(hash).or_insert_with(|| content.to_vec());
        }
        if let Some(name) = alias {
            self.alias(name, &hash)?;
        }
        Ok(hash)
    }

    fn resolve_key(&self, key: &str) -> StoreResult<ContentHash> {
        // 1. Exact full hash.
        if key.len() == 64 && is_hex(key) {
            if let Ok(hash) = ContentHash::from_hex(&key.to_ascii_lowercase()) {
                let objects = self.objects.read().expect("lock poisoned");
                if objects.contains_key(&hash) {
                    return Ok(hash);
                }
            }
        }
        // 2. Alias.
        {
            let aliases = self.aliases.read().expect("lock poisoned");
            if let Some(hash) = aliases.get(key) {
                return Ok(*hash);
            }
        }
        // 3. Hash prefix.
        if is_hex(key) {
            if key.len() < MIN_PREFIX_LEN {
                return Err(StoreError::InvalidKey {
                    key: key.to_string(),
                    reason: format!("hex prefix shorter than {MIN_PREFIX_LEN} characters"),
                });
            }
            return self.lookup_prefix(key);
        }
        Err(StoreError::NotFound(key.to_string()))
    }

    fn resolve(&self, key: &str) -> StoreResult<Vec<u8>> {
        let hash = self.resolve_key(key)?;
        let objects = self.objects.read().expect("lock poisoned");
        objects
            .get(&hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn alias(&self, name: &str, hash: &ContentHash) -> StoreResult<()> {
        validate_alias(name)?;
        {
            let objects = self.objects.read().expect("lock poisoned");
            if !objects.contains_key(hash) {
                return Err(StoreError::NotFound(hash.to_hex()));
            }
        }
        let mut aliases = self.aliases.write().expect("lock poisoned");
        aliases.insert(name.to_string(), *hash);
        Ok(())
    }

    fn aliases(&self) -> StoreResult<Vec<(String, ContentHash)>> {
        let aliases = self.aliases.read().expect("lock poisoned");
        Ok(aliases.iter().map(|(n, h)| (n.clone(), *h)).collect())
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Store / resolve
    // -----------------------------------------------------------------------

    #[test]
    fn store_and_resolve_by_full_hash() {
        let store = InMemoryContentStore::new();
        let hash = store.store(b"hello world", None).unwrap();
        assert_eq!(store.resolve(&hash.to_hex()).unwrap(), b"hello world");
    }

    #[test]
    fn store_is_idempotent() {
        let store = InMemoryContentStore::new();
        let h1 = store.store(b"same bytes", None).unwrap();
        let h2 = store.store(b"same bytes", None).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn different_content_different_hashes() {
        let store = InMemoryContentStore::new();
        let h1 = store.store(b"aaa", None).unwrap();
        let h2 = store.store(b"bbb", None).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn resolve_unknown_key_is_not_found() {
        let store = InMemoryContentStore::new();
        let err = store.resolve("no-such-key").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Prefix resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_by_unique_prefix() {
        let store = InMemoryContentStore::new();
        let hash = store.store(b"prefix me", None).unwrap();
        let prefix = &hash.to_hex()[..8];
        assert_eq!(store.resolve(prefix).unwrap(), b"prefix me");
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let store = InMemoryContentStore::new();
        // Feed entries until two hashes share a 4-char prefix. The prefix
        // space holds 16^4 = 65536 buckets, so a collision is guaranteed
        // within 65537 distinct entries.
        let mut seen: HashMap<String, ContentHash> = HashMap::new();
        let mut shared = None;
        for i in 0..70_000u32 {
            let hash = store.store(format!("probe-{i}").as_bytes(), None).unwrap();
            let prefix = hash.to_hex()[..MIN_PREFIX_LEN].to_string();
            if let Some(prev) = seen.get(&prefix) {
                if *prev != hash {
                    shared = Some(prefix);
                    break;
                }
            }
            seen.insert(prefix, hash);
        }
        let prefix = shared.expect("prefix collision within 70k probes");
        let err = store.resolve(&prefix).unwrap_err();
        assert!(matches!(err, StoreError::AmbiguousPrefix { .. }));
    }

    #[test]
    fn short_prefix_is_invalid() {
        let store = InMemoryContentStore::new();
        let hash = store.store(b"short", None).unwrap();
        let err = store.resolve(&hash.to_hex()[..3]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
    }

    #[test]
    fn prefix_matching_nothing_is_not_found() {
        let store = InMemoryContentStore::new();
        let hash = store.store(b"only entry", None).unwrap();
        // A prefix whose first character differs cannot match.
        let flipped = if hash.to_hex().starts_with('0') {
            "ffffffff"
        } else {
            "00000000"
        };
        let err = store.resolve(flipped).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Aliases
    // -----------------------------------------------------------------------

    #[test]
    fn store_with_alias_and_resolve_by_name() {
        let store = InMemoryContentStore::new();
        store.store(b"aliased content", Some("greeting")).unwrap();
        assert_eq!(store.resolve("greeting").unwrap(), b"aliased content");
    }

    #[test]
    fn alias_last_writer_wins() {
        let store = InMemoryContentStore::new();
        let h1 = store.store(b"first", Some("name")).unwrap();
        let h2 = store.store(b"second", Some("name")).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(store.resolve("name").unwrap(), b"second");
        // Hash-keyed data is untouched.
        assert_eq!(store.resolve(&h1.to_hex()).unwrap(), b"first");
    }

    #[test]
    fn alias_for_unknown_hash_is_not_found() {
        let store = InMemoryContentStore::new();
        let missing = ContentHash::from_bytes(b"never stored");
        let err = store.alias("dangling", &missing).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn invalid_alias_is_rejected() {
        let store = InMemoryContentStore::new();
        let err = store.store(b"content", Some("bad name")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAlias { .. }));
    }

    #[test]
    fn aliases_listing_is_sorted() {
        let store = InMemoryContentStore::new();
        store.store(b"z", Some("zeta")).unwrap();
        store.store(b"a", Some("alpha")).unwrap();
        let names: Vec<String> = store.aliases().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    // -----------------------------------------------------------------------
    // has()
    // -----------------------------------------------------------------------

    #[test]
    fn has_stored_entry() {
        let store = InMemoryContentStore::new();
        let hash = store.store(b"exists", None).unwrap();
        assert!(store.has(&hash.to_hex()).unwrap());
    }

    #[test]
    fn has_missing_entry_is_false() {
        let store = InMemoryContentStore::new();
        assert!(!store.has("nonexistent").unwrap());
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryContentStore::new());
        let hash = store.store(b"shared data", None).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert_eq!(store.resolve(&hash.to_hex()).unwrap(), b"shared data");
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }
}
