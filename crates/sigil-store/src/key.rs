//! Store key classification and alias validation.
//!
//! A lookup key is resolved in a fixed order:
//! 1. a 64-character hex string naming a stored hash exactly,
//! 2. a registered alias,
//! 3. a hex prefix of at least [`MIN_PREFIX_LEN`] characters matching
//!    exactly one stored hash.
//!
//! Alias names follow the same git-style rules as pattern ids, with one
//! extra restriction: a name made only of hex digits and long enough to be
//! a prefix is rejected, so an alias can never be mistaken for a hash.

use crate::error::{StoreError, StoreResult};

/// Minimum number of hex characters accepted as a hash prefix.
pub const MIN_PREFIX_LEN: usize = 4;

/// Characters that are forbidden anywhere in an alias name.
const FORBIDDEN_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', '/', '~', '^', ':', '?', '*', '[', '\\', '{', '}', '%', '=', ',', '|',
];

/// Returns `true` if `key` is made only of hex digits.
pub(crate) fn is_hex(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate an alias name, returning `Ok(())` if valid.
pub fn validate_alias(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidAlias {
            name: name.to_string(),
            reason: "alias must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(StoreError::InvalidAlias {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name.contains("..") {
        return Err(StoreError::InvalidAlias {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(StoreError::InvalidAlias {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    if name.len() >= MIN_PREFIX_LEN && is_hex(name) {
        return Err(StoreError::InvalidAlias {
            name: name.to_string(),
            reason: "hex-digit names are reserved for hash lookup".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_aliases() {
        assert!(validate_alias("greeting").is_ok());
        assert!(validate_alias("release-notes").is_ok());
        assert!(validate_alias("v1.0").is_ok());
        assert!(validate_alias("abc").is_ok()); // short hex is below prefix length
    }

    #[test]
    fn reject_empty() {
        assert!(validate_alias("").is_err());
    }

    #[test]
    fn reject_forbidden_chars() {
        assert!(validate_alias("has space").is_err());
        assert!(validate_alias("a/b").is_err());
        assert!(validate_alias("a:b").is_err());
        assert!(validate_alias("a=b").is_err());
        assert!(validate_alias("a|b").is_err());
    }

    #[test]
    fn reject_double_dot() {
        assert!(validate_alias("a..b").is_err());
    }

    #[test]
    fn reject_dot_boundaries() {
        assert!(validate_alias(".hidden").is_err());
        assert!(validate_alias("trailing.").is_err());
    }

    #[test]
    fn reject_hex_lookalikes() {
        assert!(validate_alias("cafe").is_err());
        assert!(validate_alias("deadbeef").is_err());
        let err = validate_alias("0123456789abcdef").unwrap_err();
        assert!(matches!(err, StoreError::InvalidAlias { .. }));
    }

    #[test]
    fn hex_detection() {
        assert!(is_hex("deadbeef"));
        assert!(is_hex("ABC123"));
        assert!(!is_hex("not-hex"));
        assert!(!is_hex(""));
    }
}
