//! Percent-escaping shared by the line-oriented wire formats.
//!
//! Both the Seed compact form and the COEF token form are single-line text
//! formats whose fields are separated by reserved ASCII characters. Any
//! reserved character occurring *inside* a field is escaped as `%XX` (two
//! uppercase hex digits), so a raw delimiter in the wire text is always a
//! real delimiter. `%`, newline, and carriage return are escaped
//! unconditionally, which keeps every encoded field single-line.

use crate::error::TypeError;

/// Escape `value` so it can be embedded in a wire field.
///
/// Every character in `reserved` — plus `%`, `\n`, and `\r` — is replaced by
/// `%XX`. Reserved characters must be ASCII; non-ASCII text passes through
/// untouched.
pub fn escape(value: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '%' || ch == '\n' || ch == '\r' || reserved.contains(&ch) {
            out.push_str(&format!("%{:02X}", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Reverse [`escape`]: decode every `%XX` sequence back to its byte.
///
/// Fails on truncated or non-hex escape sequences, and on escape sequences
/// that decode to invalid UTF-8.
pub fn unescape(value: &str) -> Result<String, TypeError> {
    let mut out = Vec::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            let hi = chars.next();
            let lo = chars.next();
            let (hi, lo) = match (hi, lo) {
                (Some(h), Some(l)) => (h, l),
                _ => return Err(TypeError::InvalidEscape("truncated % sequence".into())),
            };
            let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                .map_err(|_| TypeError::InvalidEscape(format!("%{hi}{lo}")))?;
            out.push(byte);
        } else {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }
    String::from_utf8(out).map_err(|e| TypeError::InvalidEscape(e.to_string()))
}
