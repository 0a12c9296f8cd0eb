//! In-memory pattern registry for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::builtin::builtin_patterns;
use crate::error::{RegistryError, RegistryResult};
use crate::pattern::Pattern;
use crate::traits::PatternRegistry;

/// An in-memory implementation of [`PatternRegistry`].
///
/// All patterns live in a `HashMap` behind a `RwLock`. Data is lost when the
/// registry is dropped.
pub struct InMemoryPatternRegistry {
    patterns: RwLock<HashMap<String, Pattern>>,
}

impl InMemoryPatternRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry pre-loaded with the built-in patterns.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for pattern in builtin_patterns() {
            registry
                .register(&pattern)
                .expect("built-in patterns are valid");
        }
        registry
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no patterns are registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryPatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry for InMemoryPatternRegistry {
    fn register(&self, pattern: &Pattern) -> RegistryResult<()> {
        pattern.validate()?;
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

impl std::fmt::Debug for InMemoryPatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPatternRegistry")
            .field("pattern_count", &self.len())
            .finish()
    }
}
