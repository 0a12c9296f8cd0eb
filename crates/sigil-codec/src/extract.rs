//! Automatic anchor extraction.
//!
//! Recovering anchors from raw content is the inverse of rendering: the
//! pattern's template is compiled into an anchored regex whose literal
//! segments are escaped and whose slots become named, non-greedy captures.
//! Extraction is only a convenience — the match is accepted solely when
//! re-rendering the captured anchors reproduces the content byte-for-byte,
//! so an ambiguous split can never produce a silently wrong Seed.
//!
//! A slot that appears more than once in a template captures at its first
//! occurrence; later occurrences match as unnamed gaps and are checked by
//! the re-render verification.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use sigil_registry::{template, Pattern, TemplateSegment};

use crate::error::{CodecError, CodecResult};

/// Recover the anchors that reproduce `content` from `pattern`.
pub fn extract_anchors(pattern: &Pattern, content: &str) -> CodecResult<BTreeMap<String, String>> {
    let segments = template::parse(&pattern.template)?;

    let mut source = String::from("(?s)^");
    let mut captured: BTreeSet<&str> = BTreeSet::new();
    for segment in &segments {
        match segment {
            TemplateSegment::Literal(text) => source.push_str(&regex::escape(text)),
            TemplateSegment::Slot(name) => {
                if captured.insert(name.as_str()) {
                    source.push_str(&format!("(?P<{name}>.*?)"));
                } else {
                    source.push_str("(?:.*?)");
                }
            }
        }
    }
    source.push('$');

    let re = Regex::new(&source).map_err(|e| CodecError::ExtractionFailed {
        pattern_id: pattern.id.clone(),
        reason: format!("template did not compile to a matcher: {e}"),
    })?;

    let caps = re.captures(content).ok_or_else(|| CodecError::ExtractionFailed {
        pattern_id: pattern.id.clone(),
        reason: "content does not match the template shape".into(),
    })?;

    let mut anchors = BTreeMap::new();
    for slot in &pattern.slots {
        let value = caps
            .name(slot)
            .ok_or_else(|| CodecError::ExtractionFailed {
                pattern_id: pattern.id.clone(),
                reason: format!("slot {slot:?} was not captured"),
            })?
            .as_str()
            .to_string();
        anchors.insert(slot.clone(), value);
    }

    // The captured split must reproduce the input exactly.
    let rendered = pattern.render(&anchors)?;
    if rendered != content {
        return Err(CodecError::ExtractionFailed {
            pattern_id: pattern.id.clone(),
            reason: "extracted anchors do not reproduce the content".into(),
        });
    }
    Ok(anchors)
}
