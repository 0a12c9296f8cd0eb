//! Pattern id validation.
//!
//! Pattern ids double as registry file names, so they follow git-style
//! naming rules with the extra restriction that they contain no path
//! separators:
//! - Must be non-empty
//! - Must not contain whitespace, `/`, `~`, `^`, `:`, `?`, `*`, `[`, `\`,
//!   `{`, `}`, `%`, `=`, `,`, `|`
//! - Must not contain `..` (double dot)
//! - Must not start or end with `.`
//! - Must not end with `.lock` or `.json`

use crate::error::{RegistryError, RegistryResult};

/// Characters that are forbidden anywhere in a pattern id.
///
/// Beyond filesystem hazards, this set covers every delimiter used by the
/// Seed and COEF wire formats, so a valid id never needs escaping.
const FORBIDDEN_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', '/', '~', '^', ':', '?', '*', '[', '\\', '{', '}', '%', '=', ',', '|',
];

/// Validate a pattern id, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use sigil_registry::names::validate_pattern_id;
///
/// assert!(validate_pattern_id("function").is_ok());
/// assert!(validate_pattern_id("signal-v2").is_ok());
/// assert!(validate_pattern_id("").is_err());
/// assert!(validate_pattern_id("bad..id").is_err());
/// ```
pub fn validate_pattern_id(name: &str) -> RegistryResult<()> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: "pattern id must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(RegistryError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name.contains("..") {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    if name.ends_with(".lock") || name.ends_with(".json") {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: "must not end with a reserved suffix".into(),
        });
    }

    Ok(())
}
