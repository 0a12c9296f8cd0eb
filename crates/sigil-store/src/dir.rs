//! Directory-backed content store.
//!
//! Layout under the caller-supplied root:
//!
//! ```text
//! <root>/objects/<64-hex>   one file per stored entry, named by hash
//! <root>/aliases.json       alias table, name -> hash hex
//! ```
//!
//! Object files and the alias table are written to a temporary file and
//! renamed into place, so a crash mid-write leaves the prior committed
//! state intact. Hashes are re-verified on read.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use sigil_crypto::ContentHasher;
use sigil_types::ContentHash;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::key::{is_hex, validate_alias, MIN_PREFIX_LEN};
use crate::traits::ContentStore;

/// A durable, directory-backed implementation of [`ContentStore`].
///
/// The storage root is an explicit constructor parameter; nothing is ever
/// written outside it.
pub struct DirContentStore {
    root: PathBuf,
    objects_dir: PathBuf,
    hashes: RwLock<BTreeSet<ContentHash>>,
    aliases: RwLock<BTreeMap<String, ContentHash>>,
}

impl DirContentStore {
    /// Open (or create) a store rooted at `root`.
    ///
    /// The object index and alias table are loaded eagerly. Files in the
    /// objects directory that are not named by a 64-hex hash are skipped
    /// with a warning.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        let objects_dir = root.join("objects");
        std::fs::create_dir_all(&objects_dir)?;

        let mut hashes = BTreeSet::new();
        for entry in std::fs::read_dir(&objects_dir)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            match ContentHash::from_hex(name) {
                Ok(hash) => {
                    hashes.insert(hash);
                }
                Err(_) => {
                    warn!(path = %path.display(), "skipping non-hash file in objects dir");
                }
            }
        }

        let aliases_path = root.join("aliases.json");
        let mut aliases = BTreeMap::new();
        if aliases_path.exists() {
            let data = std::fs::read_to_string(&aliases_path)?;
            let table: BTreeMap<String, String> = serde_json::from_str(&data)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            for (name, hex) in table {
                match ContentHash::from_hex(&hex) {
                    Ok(hash) => {
                        aliases.insert(name, hash);
                    }
                    Err(_) => {
                        warn!(alias = %name, "skipping alias with malformed hash");
                    }
                }
            }
        }

        debug!(
            root = %root.display(),
            entries = hashes.len(),
            aliases = aliases.len(),
            "content store opened"
        );

        Ok(Self {
            root,
            objects_dir,
            hashes: RwLock::new(hashes),
            aliases: RwLock::new(aliases),
        })
    }

    /// The storage root this store persists to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of stored entries (aliases not counted).
    pub fn len(&self) -> usize {
        self.hashes.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.hashes.read().expect("lock poisoned").is_empty()
    }

    fn object_path(&self, hash: &ContentHash) -> PathBuf {
        self.objects_dir.join(hash.to_hex())
    }

    fn write_object(&self, hash: &ContentHash, content: &[u8]) -> StoreResult<()> {
        let target = self.object_path(hash);
        if target.exists() {
            return Ok(());
        }
        let mut tmp = tempfile::NamedTempFile::new_in(&self.objects_dir)?;
        tmp.write_all(content)?;
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        debug!(hash = %hash.short_hex(), bytes = content.len(), "entry written");
        Ok(())
    }

    fn write_alias_table(&self, aliases: &BTreeMap<String, ContentHash>) -> StoreResult<()> {
        let table: BTreeMap<&String, String> =
            aliases.iter().map(|(n, h)| (n, h.to_hex())).collect();
        let data = serde_json::to_vec_pretty(&table)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&data)?;
        tmp.persist(self.root.join("aliases.json"))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn lookup_prefix(&self, prefix: &str) -> StoreResult<ContentHash> {
        let needle = prefix.to_ascii_lowercase();
        let hashes = self.hashes.read().expect("lock poisoned");
        let mut matches = hashes.iter().filter(|h| h.to_hex().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(hash), None) => Ok(*hash),
            (Some(_), Some(_)) => {
                let count = hashes
                    .iter()
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

impl ContentStore for DirContentStore {
    fn store(&self, content: &[u8], alias: Option<&str>) -> StoreResult<ContentHash> {
        let hash = ContentHasher::CONTENT.hash(content);
        self.write_object(&hash, content)?;
        self.hashes.write().expect("lock poisoned").insert(hash);
        if let Some(name) = alias {
            self.alias(name, &hash)?;
        }
        Ok(hash)
    }

    fn resolve_key(&self, key: &str) -> StoreResult<ContentHash> {
        // 1. Exact full hash.
        if key.len() == 64 && is_hex(key) {
            if let Ok(hash) = ContentHash::from_hex(&key.to_ascii_lowercase()) {
                if self.hashes.read().expect("lock poisoned").contains(&hash) {
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
        let content = std::fs::read(self.object_path(&hash))?;
        // Entries are immutable; a mismatch means on-disk corruption.
        if !ContentHasher::CONTENT.verify(&content, &hash) {
            return Err(StoreError::CorruptEntry {
                hash: hash.to_hex(),
                reason: "content no longer matches its hash".into(),
            });
        }
        Ok(content)
    }

    fn alias(&self, name: &str, hash: &ContentHash) -> StoreResult<()> {
        validate_alias(name)?;
        if !self.hashes.read().expect("lock poisoned").contains(hash) {
            return Err(StoreError::NotFound(hash.to_hex()));
        }
        let mut aliases = self.aliases.write().expect("lock poisoned");
        aliases.insert(name.to_string(), *hash);
        self.write_alias_table(&aliases)
    }

    fn aliases(&self) -> StoreResult<Vec<(String, ContentHash)>> {
        let aliases = self.aliases.read().expect("lock poisoned");
        Ok(aliases.iter().map(|(n, h)| (n.clone(), *h)).collect())
    }
}

impl std::fmt::Debug for DirContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirContentStore")
            .field("root", &self.root)
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirContentStore::open(dir.path()).unwrap();
        let hash = store.store(b"hello disk", None).unwrap();
        assert_eq!(store.resolve(&hash.to_hex()).unwrap(), b"hello disk");
    }

    #[test]
    fn content_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let hash = {
            let store = DirContentStore::open(dir.path()).unwrap();
            store.store(b"durable bytes", Some("keeper")).unwrap()
        };
        let reopened = DirContentStore::open(dir.path()).unwrap();
        assert_eq!(reopened.resolve(&hash.to_hex()).unwrap(), b"durable bytes");
        assert_eq!(reopened.resolve("keeper").unwrap(), b"durable bytes");
    }

    #[test]
    fn store_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirContentStore::open(dir.path()).unwrap();
        let h1 = store.store(b"same", None).unwrap();
        let h2 = store.store(b"same", None).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
        let files: Vec<_> = std::fs::read_dir(dir.path().join("objects"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn resolve_by_prefix_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let hash = {
            let store = DirContentStore::open(dir.path()).unwrap();
            store.store(b"prefixed", None).unwrap()
        };
        let reopened = DirContentStore::open(dir.path()).unwrap();
        let prefix = &hash.to_hex()[..10];
        assert_eq!(reopened.resolve(prefix).unwrap(), b"prefixed");
    }

    #[test]
    fn alias_reassignment_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = DirContentStore::open(dir.path()).unwrap();
            store.store(b"v1", Some("latest")).unwrap();
            store.store(b"v2", Some("latest")).unwrap();
        }
        let reopened = DirContentStore::open(dir.path()).unwrap();
        assert_eq!(reopened.resolve("latest").unwrap(), b"v2");
    }

    #[test]
    fn corrupt_entry_detected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirContentStore::open(dir.path()).unwrap();
        let hash = store.store(b"pristine", None).unwrap();
        // Corrupt the object file behind the store's back.
        std::fs::write(dir.path().join("objects").join(hash.to_hex()), b"tampered").unwrap();
        let err = store.resolve(&hash.to_hex()).unwrap_err();
        assert!(matches!(err, StoreError::CorruptEntry { .. }));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirContentStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.resolve("missing").unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(!store.has("missing").unwrap());
    }

    #[test]
    fn stray_files_in_objects_dir_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("objects")).unwrap();
        std::fs::write(dir.path().join("objects").join("README"), b"hi").unwrap();
        let store = DirContentStore::open(dir.path()).unwrap();
        assert!(store.is_empty());
    }
}
