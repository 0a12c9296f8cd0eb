use std::collections::BTreeMap;
use std::sync::Arc;

use sigil_codec::{DecodeResult, Seed, SeedCodec};
use sigil_coef::{CoefExecutor, CoefProgram, ExecOutcome};
use sigil_registry::{
    install_builtins, DirPatternRegistry, InMemoryPatternRegistry, Pattern, PatternRegistry,
};
use sigil_store::{ContentStore, DirContentStore, InMemoryContentStore};
use sigil_types::ContentHash;
use tracing::debug;

use crate::config::SigilConfig;
use crate::error::SdkResult;

/// High-level Sigil workspace.
///
/// Wires a pattern registry and content store into the seed codec and COEF
/// executor, with the built-in patterns installed. All components share the
/// same handles, so a pattern registered through [`Sigil::register_pattern`]
/// is immediately visible to `encode`, `decode`, and program execution.
pub struct Sigil {
    registry: Arc<dyn PatternRegistry>,
    store: Arc<dyn ContentStore>,
    codec: SeedCodec,
    executor: CoefExecutor,
}

impl Sigil {
    /// Open a durable workspace at the configured storage root.
    pub fn open(config: &SigilConfig) -> SdkResult<Self> {
        let registry = Arc::new(DirPatternRegistry::open(config.registry_path())?);
        let store = Arc::new(DirContentStore::open(config.store_path())?);
        debug!(root = %config.root.display(), "sigil workspace opened");
        Self::assemble(registry, store)
    }

    /// Open an ephemeral, in-memory workspace (tests, REPL sessions).
    pub fn in_memory() -> Self {
        let registry = Arc::new(InMemoryPatternRegistry::new());
        let store = Arc::new(InMemoryContentStore::new());
        Self::assemble(registry, store).expect("in-memory assembly cannot fail")
    }

    fn assemble(
        registry: Arc<dyn PatternRegistry>,
        store: Arc<dyn ContentStore>,
    ) -> SdkResult<Self> {
        install_builtins(registry.as_ref())?;
        let codec = SeedCodec::new(Arc::clone(&registry));
        let executor = CoefExecutor::new(Arc::clone(&registry), Arc::clone(&store));
        Ok(Self {
            registry,
            store,
            codec,
            executor,
        })
    }

    // ---- Pattern operations ----

    /// Register (or replace) a pattern.
    pub fn register_pattern(&self, pattern: &Pattern) -> SdkResult<()> {
        Ok(self.registry.register(pattern)?)
    }

    /// Look up a pattern by id.
    pub fn pattern(&self, id: &str) -> SdkResult<Pattern> {
        Ok(self.registry.get(id)?)
    }

    /// All registered pattern ids, sorted.
    pub fn patterns(&self) -> SdkResult<Vec<String>> {
        Ok(self.registry.list()?)
    }

    // ---- Codec operations ----

    /// Encode content against a registered pattern.
    pub fn encode(
        &self,
        content: &str,
        pattern_id: &str,
        anchor_overrides: Option<&BTreeMap<String, String>>,
    ) -> SdkResult<Seed> {
        Ok(self.codec.encode(content, pattern_id, anchor_overrides)?)
    }

    /// Reconstruct and verify content from a seed.
    pub fn decode(&self, seed: &Seed) -> SdkResult<DecodeResult> {
        Ok(self.codec.decode(seed)?)
    }

    /// Parse a compact seed line and decode it.
    pub fn decode_compact(&self, text: &str) -> SdkResult<DecodeResult> {
        let seed = Seed::from_compact(text)?;
        self.decode(&seed)
    }

    // ---- Content store operations ----

    /// Store bytes, optionally under an alias, returning the content hash.
    pub fn store(&self, content: &[u8], alias: Option<&str>) -> SdkResult<ContentHash> {
        Ok(self.store.store(content, alias)?)
    }

    /// Resolve a key (full hash, unambiguous prefix, or alias) to content.
    pub fn resolve(&self, key: &str) -> SdkResult<Vec<u8>> {
        Ok(self.store.resolve(key)?)
    }

    /// Check whether a key resolves to stored content.
    pub fn has(&self, key: &str) -> SdkResult<bool> {
        Ok(self.store.has(key)?)
    }

    // ---- Program execution ----

    /// Run a COEF program.
    pub fn run(&self, program: &CoefProgram) -> SdkResult<ExecOutcome> {
        Ok(self.executor.run(program)?)
    }

    /// Parse a COEF wire line and run it.
    pub fn run_wire(&self, wire: &str) -> SdkResult<ExecOutcome> {
        let program = CoefProgram::from_wire(wire)?;
        self.run(&program)
    }

    // ---- Component access ----

    /// The shared pattern registry handle.
    pub fn registry(&self) -> &Arc<dyn PatternRegistry> {
        &self.registry
    }

    /// The shared content store handle.
    pub fn content_store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }
}

impl std::fmt::Debug for Sigil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sigil").finish_non_exhaustive()
    }
}
