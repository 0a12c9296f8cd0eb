//! Compact wire format for Seeds.
//!
//! A Seed serializes to a single line:
//!
//! ```text
//! sd1:<pattern_id>:<hash16>:<key>=<value>,<key>=<value>
//! ```
//!
//! `sd1` is the format tag. `<hash16>` is the 16-hex-digit truncation of
//! the content hash carried by the Seed (see [`sigil_types::HashPrefix`] —
//! the truncation length is part of the format, not an accident). Anchor
//! pairs are sorted by key. The delimiters `:`, `,`, and `=` — plus `%` and
//! line breaks — are percent-escaped wherever they occur inside the pattern
//! id, a key, or a value, so the format stays unambiguous for arbitrary
//! anchor text.

use std::collections::BTreeMap;

use sigil_types::{wire, HashPrefix};

use crate::error::{CodecError, CodecResult};
use crate::seed::Seed;

/// Format tag for the current Seed wire format.
pub const WIRE_TAG: &str = "sd1";

/// Characters that delimit fields and must be escaped inside them.
const RESERVED: &[char] = &[':', ',', '='];

impl Seed {
    /// Serialize to the compact single-line form.
    pub fn to_compact(&self) -> String {
        let pairs = self
            .anchors
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    wire::escape(k, RESERVED),
                    wire::escape(v, RESERVED)
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{WIRE_TAG}:{}:{}:{pairs}",
            wire::escape(&self.pattern_id, RESERVED),
            self.content_hash.to_hex()
        )
    }

    /// Parse the compact form back into a Seed.
    pub fn from_compact(text: &str) -> CodecResult<Self> {
        let mut parts = text.splitn(4, ':');
        let (tag, pattern_id, hash, pairs) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(tag), Some(id), Some(hash), Some(pairs)) => (tag, id, hash, pairs),
                _ => {
                    return Err(CodecError::MalformedWire(
                        "expected tag:pattern:hash:anchors".into(),
                    ))
                }
            };

        if tag != WIRE_TAG {
            return Err(CodecError::MalformedWire(format!(
                "unknown format tag {tag:?}"
            )));
        }

        let pattern_id = wire::unescape(pattern_id)
            .map_err(|e| CodecError::MalformedWire(e.to_string()))?;
        if pattern_id.is_empty() {
            return Err(CodecError::MalformedWire("empty pattern id".into()));
        }

        let content_hash = HashPrefix::from_hex(hash)
            .map_err(|e| CodecError::MalformedWire(format!("bad hash field: {e}")))?;

        let mut anchors = BTreeMap::new();
        if !pairs.is_empty() {
            for pair in pairs.split(',') {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    CodecError::MalformedWire(format!("anchor pair without '=': {pair:?}"))
                })?;
                let key = wire::unescape(key)
                    .map_err(|e| CodecError::MalformedWire(e.to_string()))?;
                let value = wire::unescape(value)
                    .map_err(|e| CodecError::MalformedWire(e.to_string()))?;
                if key.is_empty() {
                    return Err(CodecError::MalformedWire("empty anchor key".into()));
                }
                if anchors.insert(key.clone(), value).is_some() {
                    return Err(CodecError::MalformedWire(format!(
                        "duplicate anchor key {key:?}"
                    )));
                }
            }
        }

        Ok(Seed::new(pattern_id, anchors, content_hash))
    }
}
