use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use sigil_crypto::ContentHasher;
use sigil_registry::PatternRegistry;
use sigil_types::{ContentHash, HashPrefix};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::extract::extract_anchors;
use crate::seed::Seed;

/// The outcome of decoding a [`Seed`].
///
/// Decoding always produces a reconstruction; `is_lossless` is the
/// authoritative signal for whether it matches the original bytes. A caller
/// may still use a lossy reconstruction, but only after looking at the flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeResult {
    /// The reconstructed content.
    pub content: String,
    /// Full hash of the reconstructed content.
    pub content_hash: ContentHash,
    /// The truncated hash recorded in the seed at encode time.
    pub expected_hash: HashPrefix,
    /// Whether the reconstruction hashes back to the recorded hash.
    pub is_lossless: bool,
}

/// Encoder/decoder over a pattern registry.
///
/// The codec holds no state of its own; all pattern lookups go through the
/// shared registry handle, so a pattern registered after the codec was
/// built is immediately usable.
pub struct SeedCodec {
    registry: Arc<dyn PatternRegistry>,
}

impl SeedCodec {
    /// Create a codec over the given registry.
    pub fn new(registry: Arc<dyn PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Encode `content` against a registered pattern.
    ///
    /// If `anchor_overrides` is given, those values become the anchors
    /// directly — the caller asserts they reproduce `content` when
    /// substituted. Without overrides the anchors are recovered from the
    /// content by [`extract_anchors`], which fails rather than guess.
    ///
    /// The anchor set must cover the pattern's slots exactly: a missing
    /// slot is a [`CodecError::MissingSlot`] raised here, not at decode
    /// time, and an anchor naming no slot is a
    /// [`CodecError::UnknownAnchor`].
    pub fn encode(
        &self,
        content: &str,
        pattern_id: &str,
        anchor_overrides: Option<&BTreeMap<String, String>>,
    ) -> CodecResult<Seed> {
        let pattern = self.registry.get(pattern_id)?;

        let anchors = match anchor_overrides {
            Some(overrides) => {
                let slots: BTreeSet<&str> = pattern.slots.iter().map(String::as_str).collect();
                for slot in &pattern.slots {
                    if !overrides.contains_key(slot) {
                        return Err(CodecError::MissingSlot(slot.clone()));
                    }
                }
                for anchor in overrides.keys() {
                    if !slots.contains(anchor.as_str()) {
                        return Err(CodecError::UnknownAnchor {
                            anchor: anchor.clone(),
                            pattern_id: pattern_id.to_string(),
                        });
                    }
                }
                overrides.clone()
            }
            None => extract_anchors(&pattern, content)?,
        };

        let content_hash = ContentHasher::CONTENT.hash(content.as_bytes());
        debug!(
            pattern_id,
            hash = %content_hash.short_hex(),
            anchors = anchors.len(),
            "content encoded"
        );
        Ok(Seed::new(pattern_id, anchors, content_hash.prefix()))
    }

    /// Reconstruct content from a seed and verify it.
    ///
    /// Fails with [`CodecError::PatternNotFound`] for an unknown pattern id
    /// and [`CodecError::MissingSlot`] when the seed's anchors do not cover
    /// the template. A hash mismatch is not an error: the result carries
    /// `is_lossless = false` and the mismatched reconstruction so the
    /// caller can inspect what went wrong.
    pub fn decode(&self, seed: &Seed) -> CodecResult<DecodeResult> {
        let pattern = self.registry.get(&seed.pattern_id)?;
        let content = pattern.render(&seed.anchors)?;

        let content_hash = ContentHasher::CONTENT.hash(content.as_bytes());
        let is_lossless = seed.content_hash.matches(&content_hash);
        if !is_lossless {
            debug!(
                pattern_id = %seed.pattern_id,
                expected = %seed.content_hash,
                computed = %content_hash.short_hex(),
                "reconstruction hash mismatch"
            );
        }
        Ok(DecodeResult {
            content,
            content_hash,
            expected_hash: seed.content_hash,
            is_lossless,
        })
    }
}

impl std::fmt::Debug for SeedCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCodec").finish_non_exhaustive()
    }
}
