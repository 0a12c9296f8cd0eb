use crate::error::RegistryResult;
use crate::pattern::Pattern;

/// Pattern registry.
///
/// All implementations must satisfy these invariants:
/// - `register` validates the pattern (id rules, template↔slots agreement)
///   before accepting it, and replaces any existing pattern with the same id.
/// - A registered pattern stays resolvable for the lifetime of the backing
///   storage; there is no delete operation, so a stored Seed can never lose
///   its pattern to a silent removal.
/// - Writes are atomic from a reader's point of view: a concurrent `get`
///   observes either the old record or the new one, never a partial write.
/// - `list` returns ids in lexicographic order.
pub trait PatternRegistry: Send + Sync {
    /// Insert or replace a pattern by id.
    fn register(&self, pattern: &Pattern) -> RegistryResult<()>;

    /// Look up a pattern by id. Fails with `NotFound` if absent.
    fn get(&self, id: &str) -> RegistryResult<Pattern>;

    /// Check whether a pattern id is registered.
    fn contains(&self, id: &str) -> RegistryResult<bool>;

    /// All registered pattern ids, sorted lexicographically.
    fn list(&self) -> RegistryResult<Vec<String>>;
}
