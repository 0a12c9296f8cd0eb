use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sigil_crypto::ContentHasher;
use sigil_types::ContentHash;

use crate::error::{RegistryError, RegistryResult};
use crate::names::validate_pattern_id;
use crate::template;

/// A named, registered template with a fixed set of slots.
///
/// A pattern represents one recognized shape of content — a function
/// definition, a status reading, a protocol message. The `template` holds
/// `{slot}` placeholders; `slots` declares exactly the placeholder names the
/// template references. The two must agree: no orphan slots, no unresolved
/// placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique pattern identifier.
    pub id: String,
    /// Template text with `{slot}` placeholders.
    pub template: String,
    /// Ordered list of placeholder names the template must fill.
    pub slots: Vec<String>,
    /// Human-readable description of the shape this pattern captures.
    pub description: String,
}

impl Pattern {
    /// Create and validate a new pattern.
    pub fn new(
        id: impl Into<String>,
        template: impl Into<String>,
        slots: Vec<String>,
        description: impl Into<String>,
    ) -> RegistryResult<Self> {
        let pattern = Self {
            id: id.into(),
            template: template.into(),
            slots,
            description: description.into(),
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Check id validity and template↔slots consistency.
    ///
    /// Every placeholder in the template must appear in `slots` and vice
    /// versa; duplicate slot declarations are rejected.
    pub fn validate(&self) -> RegistryResult<()> {
        validate_pattern_id(&self.id)?;

        let referenced_names = template::placeholders(&self.template)?;
        let referenced: BTreeSet<&str> = referenced_names.iter().map(String::as_str).collect();

        let declared: BTreeSet<&str> = self.slots.iter().map(String::as_str).collect();
        if declared.len() != self.slots.len() {
            return Err(RegistryError::InvalidPattern {
                id: self.id.clone(),
                reason: "duplicate slot declaration".into(),
            });
        }

        for slot in &referenced {
            if !declared.contains(slot) {
                return Err(RegistryError::InvalidPattern {
                    id: self.id.clone(),
                    reason: format!("template references undeclared slot {slot:?}"),
                });
            }
        }
        for slot in &declared {
            if !referenced.contains(slot) {
                return Err(RegistryError::InvalidPattern {
                    id: self.id.clone(),
                    reason: format!("declared slot {slot:?} never appears in template"),
                });
            }
        }
        Ok(())
    }

    /// Substitute anchors into this pattern's template.
    pub fn render(&self, anchors: &BTreeMap<String, String>) -> RegistryResult<String> {
        template::render(&self.template, anchors)
    }

    /// Domain-separated fingerprint over (id, template, slots).
    ///
    /// Persisted alongside the record and re-checked on load so a corrupted
    /// or hand-edited record is detected instead of silently decoded.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHasher::PATTERN
            .hash_json(&(&self.id, &self.template, &self.slots))
            .expect("fingerprint serialization cannot fail for plain strings")
    }
}
