//! Template parsing and substitution.
//!
//! Templates are plain text with `{slot}` placeholders. `{{` and `}}`
//! encode literal braces. Substitution is a single pass over the parsed
//! segments: anchor values are inserted verbatim and never re-scanned, so a
//! value containing `{name}` cannot trigger a second substitution.

use std::collections::BTreeMap;

use crate::error::{RegistryError, RegistryResult};

/// One parsed piece of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A named placeholder, filled from the anchor map.
    Slot(String),
}

/// Parse a template into its literal and slot segments.
///
/// Fails on unbalanced braces, empty placeholders, and placeholder names
/// that are not identifiers (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn parse(template: &str) -> RegistryResult<Vec<TemplateSegment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(RegistryError::MalformedTemplate(
                                "unclosed placeholder".into(),
                            ))
                        }
                    }
                }
                validate_slot_name(&name)?;
                if !literal.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(TemplateSegment::Slot(name));
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(RegistryError::MalformedTemplate(
                        "unmatched '}' outside placeholder".into(),
                    ));
                }
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(TemplateSegment::Literal(literal));
    }
    Ok(segments)
}

/// The placeholder names referenced by a template, in order of first use.
pub fn placeholders(template: &str) -> RegistryResult<Vec<String>> {
    let mut names = Vec::new();
    for segment in parse(template)? {
        if let TemplateSegment::Slot(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Substitute anchors into a template.
///
/// Every placeholder must have an anchor value; a missing one is a
/// [`RegistryError::MissingSlot`]. Anchors that no placeholder references
/// are ignored.
pub fn render(template: &str, anchors: &BTreeMap<String, String>) -> RegistryResult<String> {
    let mut out = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            TemplateSegment::Literal(text) => out.push_str(&text),
            TemplateSegment::Slot(name) => match anchors.get(&name) {
                Some(value) => out.push_str(value),
                None => return Err(RegistryError::MissingSlot(name)),
            },
        }
    }
    Ok(out)
}

fn validate_slot_name(name: &str) -> RegistryResult<()> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_head && valid_tail {
        Ok(())
    } else {
        Err(RegistryError::MalformedTemplate(format!(
            "invalid placeholder name: {name:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_literal_only() {
        let segments = parse("no placeholders here").unwrap();
        assert_eq!(
            segments,
            vec![TemplateSegment::Literal("no placeholders here".into())]
        );
    }

    #[test]
    fn parse_slots_and_literals() {
        let segments = parse("[{level}] {source}").unwrap();
        assert_eq!(
            segments,
            vec![
                TemplateSegment::Literal("[".into()),
                TemplateSegment::Slot("level".into()),
                TemplateSegment::Literal("] ".into()),
                TemplateSegment::Slot("source".into()),
            ]
        );
    }

    #[test]
    fn parse_escaped_braces() {
        let segments = parse("a {{literal}} brace").unwrap();
        assert_eq!(
            segments,
            vec![TemplateSegment::Literal("a {literal} brace".into())]
        );
    }

    #[test]
    fn parse_rejects_unclosed_placeholder() {
        let err = parse("broken {slot").unwrap_err();
        assert!(matches!(err, RegistryError::MalformedTemplate(_)));
    }

    #[test]
    fn parse_rejects_stray_close_brace() {
        let err = parse("broken } brace").unwrap_err();
        assert!(matches!(err, RegistryError::MalformedTemplate(_)));
    }

    #[test]
    fn parse_rejects_empty_placeholder() {
        assert!(parse("empty {} here").is_err());
    }

    #[test]
    fn parse_rejects_non_identifier_placeholder() {
        assert!(parse("{not valid}").is_err());
        assert!(parse("{1leading}").is_err());
    }

    #[test]
    fn placeholders_deduplicated_in_order() {
        let names = placeholders("{b} {a} {b}").unwrap();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    #[test]
    fn render_fills_all_slots() {
        let out = render(
            "[{level}] {source}: {message}",
            &anchors(&[("level", "WARN"), ("source", "core"), ("message", "hot")]),
        )
        .unwrap();
        assert_eq!(out, "[WARN] core: hot");
    }

    #[test]
    fn render_missing_slot_errors() {
        let err = render("{a} {b}", &anchors(&[("a", "x")])).unwrap_err();
        assert!(matches!(err, RegistryError::MissingSlot(name) if name == "b"));
    }

    #[test]
    fn render_ignores_extra_anchors() {
        let out = render("{a}", &anchors(&[("a", "x"), ("unused", "y")])).unwrap();
        assert_eq!(out, "x");
    }

    #[test]
    fn render_does_not_rescan_inserted_values() {
        // A value containing placeholder syntax is inserted verbatim.
        let out = render("{body}", &anchors(&[("body", "return f\"hello {name}\"")])).unwrap();
        assert_eq!(out, "return f\"hello {name}\"");
    }

    #[test]
    fn render_repeated_slot() {
        let out = render("{x}-{x}", &anchors(&[("x", "ab")])).unwrap();
        assert_eq!(out, "ab-ab");
    }

    #[test]
    fn render_escaped_braces() {
        let out = render("{{\"k\": {v}}}", &anchors(&[("v", "1")])).unwrap();
        assert_eq!(out, "{\"k\": 1}");
    }

    #[test]
    fn render_multiline_template() {
        let template = "def {name}({param}):\n    \"\"\"{doc}\"\"\"\n    {body}";
        let out = render(
            template,
            &anchors(&[
                ("name", "greet"),
                ("param", "name"),
                ("doc", "Say hello."),
                ("body", "return f\"hello {name}\""),
            ]),
        )
        .unwrap();
        assert_eq!(
            out,
            "def greet(name):\n    \"\"\"Say hello.\"\"\"\n    return f\"hello {name}\""
        );
    }
}
