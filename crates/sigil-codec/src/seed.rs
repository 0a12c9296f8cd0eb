use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigil_types::HashPrefix;

/// The compact, serialized reference to one piece of content.
///
/// A Seed carries everything needed to reconstruct the original bytes from
/// its pattern — the pattern id, the anchor values that vary, and a
/// truncated hash of the content recorded at encode time. Seeds are
/// immutable once created; decoding is idempotent and repeatable.
///
/// The hash is a [`HashPrefix`] (first 8 bytes of the BLAKE3 content hash)
/// by construction, so the in-memory Seed and its wire form carry exactly
/// the same information and `from_compact(to_compact(s)) == s` holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Id of the pattern this seed was encoded against.
    pub pattern_id: String,
    /// Slot name → the exact substring observed in the original content.
    pub anchors: BTreeMap<String, String>,
    /// Truncated hash of the original content, computed at encode time.
    pub content_hash: HashPrefix,
}

impl Seed {
    /// Construct a seed from its parts.
    pub fn new(
        pattern_id: impl Into<String>,
        anchors: BTreeMap<String, String>,
        content_hash: HashPrefix,
    ) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            anchors,
            content_hash,
        }
    }
}
