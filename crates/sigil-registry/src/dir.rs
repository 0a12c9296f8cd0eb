//! Directory-backed pattern registry.
//!
//! One JSON record per pattern, named `<id>.json`, under a root directory
//! passed in by the caller. Records are loaded eagerly at construction;
//! `register` writes the record to a temporary file and renames it into
//! place, so a crash mid-write leaves the previous record intact.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::pattern::Pattern;
use crate::traits::PatternRegistry;

/// On-disk record: the pattern plus a fingerprint over (id, template, slots).
///
/// The fingerprint is re-checked on load; a record that fails the check is
/// skipped rather than decoded into a silently wrong template.
#[derive(Debug, Serialize, Deserialize)]
struct PatternRecord {
    #[serde(flatten)]
    pattern: Pattern,
    fingerprint: String,
}

/// A durable, directory-backed implementation of [`PatternRegistry`].
pub struct DirPatternRegistry {
    root: PathBuf,
    patterns: RwLock<HashMap<String, Pattern>>,
}

impl DirPatternRegistry {
    /// Open (or create) a registry rooted at `root`.
    ///
    /// Existing records are loaded eagerly. Records that fail to parse,
    /// validate, or match their fingerprint are skipped with a warning.
    pub fn open(root: impl AsRef<Path>) -> RegistryResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let mut patterns = HashMap::new();
        for entry in std::fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::load_record(&path) {
                Ok(pattern) => {
                    patterns.insert(pattern.id.clone(), pattern);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping corrupt pattern record");
                }
            }
        }
        debug!(root = %root.display(), count = patterns.len(), "pattern registry loaded");

        Ok(Self {
            root,
            patterns: RwLock::new(patterns),
        })
    }

    /// The storage root this registry persists to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no patterns are registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.read().expect("lock poisoned").is_empty()
    }

    fn load_record(path: &Path) -> RegistryResult<Pattern> {
        let data = std::fs::read_to_string(path)?;
        let record: PatternRecord =
            serde_json::from_str(&data).map_err(|e| RegistryError::Serialization(e.to_string()))?;
        record.pattern.validate()?;

        let expected = record.pattern.fingerprint().to_hex();
        if record.fingerprint != expected {
            return Err(RegistryError::CorruptRecord {
                id: record.pattern.id.clone(),
                reason: format!(
                    "fingerprint mismatch: recorded {}, computed {}",
                    record.fingerprint, expected
                ),
            });
        }
        Ok(record.pattern)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn write_record(&self, pattern: &Pattern) -> RegistryResult<()> {
        let record = PatternRecord {
            pattern: pattern.clone(),
            fingerprint: pattern.fingerprint().to_hex(),
        };
        let data = serde_json::to_vec_pretty(&record)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&data)?;
        tmp.persist(self.record_path(&pattern.id))
            .map_err(|e| RegistryError::Io(e.error))?;
        debug!(id = %pattern.id, "pattern record written");
        Ok(())
    }
}

impl PatternRegistry for DirPatternRegistry {
    fn register(&self, pattern: &Pattern) -> RegistryResult<()> {
        pattern.validate()?;
        // Persist first, then publish to readers.
        self.write_record(pattern)?;
        let mut map = self.patterns.write().expect("lock poisoned");
        map.insert(pattern.id.clone(), pattern.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> RegistryResult<Pattern> {
        let map = self.patterns.read().expect("lock poisoned");
        map.get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    fn contains(&self, id: &str) -> RegistryResult<bool> {
        let map = self.patterns.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn list(&self) -> RegistryResult<Vec<String>> {
        let map = self.patterns.read().expect("lock poisoned");
        let mut ids: Vec<String> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for DirPatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirPatternRegistry")
            .field("root", &self.root)
            .field("pattern_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pattern(id: &str) -> Pattern {
        Pattern::new(id, "{a}/{b}", vec!["a".into(), "b".into()], "test shape").unwrap()
    }

    #[test]
    fn register_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DirPatternRegistry::open(dir.path()).unwrap();
        registry.register(&test_pattern("p1")).unwrap();
        assert_eq!(registry.get("p1").unwrap().id, "p1");
    }

    #[test]
    fn registration_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = DirPatternRegistry::open(dir.path()).unwrap();
            registry.register(&test_pattern("durable")).unwrap();
        }
        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        let pattern = reopened.get("durable").unwrap();
        assert_eq!(pattern.template, "{a}/{b}");
        assert_eq!(pattern.slots, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn update_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = DirPatternRegistry::open(dir.path()).unwrap();
            registry.register(&test_pattern("p")).unwrap();
            let updated = Pattern::new("p", "{a}", vec!["a".into()], "v2").unwrap();
            registry.register(&updated).unwrap();
        }
        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        assert_eq!(reopened.get("p").unwrap().template, "{a}");
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DirPatternRegistry::open(dir.path()).unwrap();
        assert!(matches!(
            registry.get("ghost").unwrap_err(),
            RegistryError::NotFound(_)
        ));
    }

    #[test]
    fn register_rejects_inconsistent_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DirPatternRegistry::open(dir.path()).unwrap();
        let bad = Pattern {
            id: "bad".into(),
            template: "{a} {b}".into(),
            slots: vec!["a".into()],
            description: String::new(),
        };
        assert!(registry.register(&bad).is_err());
        // Nothing was persisted.
        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn corrupt_record_is_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = DirPatternRegistry::open(dir.path()).unwrap();
            registry.register(&test_pattern("good")).unwrap();
        }
        std::fs::write(dir.path().join("evil.json"), b"{ not json").unwrap();

        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.contains("good").unwrap());
    }

    #[test]
    fn tampered_record_fails_fingerprint_and_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = DirPatternRegistry::open(dir.path()).unwrap();
            registry.register(&test_pattern("tampered")).unwrap();
        }
        // Hand-edit the template without refreshing the fingerprint.
        let path = dir.path().join("tampered.json");
        let data = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, data.replace("{a}/{b}", "{a}-{b}")).unwrap();

        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        assert!(!reopened.contains("tampered").unwrap());
    }

    #[test]
    fn non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.txt"), b"not a record").unwrap();
        let registry = DirPatternRegistry::open(dir.path()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn list_is_sorted_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = DirPatternRegistry::open(dir.path()).unwrap();
            registry.register(&test_pattern("zebra")).unwrap();
            registry.register(&test_pattern("alpha")).unwrap();
        }
        let reopened = DirPatternRegistry::open(dir.path()).unwrap();
        assert_eq!(reopened.list().unwrap(), vec!["alpha", "zebra"]);
    }
}
