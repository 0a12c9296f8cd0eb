//! Built-in patterns.
//!
//! These ship pre-registered as fixtures for the common shapes the codec is
//! exercised against. They are convenience data, not contract surface —
//! callers can register their own patterns over the same ids.

use crate::error::RegistryResult;
use crate::pattern::Pattern;
use crate::traits::PatternRegistry;

/// The patterns every fresh registry starts with.
pub fn builtin_patterns() -> Vec<Pattern> {
    vec![
        Pattern::new(
            "signal",
            "[{level}] {source}: {message}",
            vec!["level".into(), "source".into(), "message".into()],
            "Short structured signal message",
        )
        .expect("builtin signal pattern is valid"),
        Pattern::new(
            "reading",
            "{tag}: {value} {unit} @ {timestamp}",
            vec![
                "tag".into(),
                "value".into(),
                "unit".into(),
                "timestamp".into(),
            ],
            "Tagged sensor or status reading",
        )
        .expect("builtin reading pattern is valid"),
        Pattern::new(
            "function",
            "def {name}({param}):\n    \"\"\"{doc}\"\"\"\n    {body}",
            vec!["name".into(), "param".into(), "doc".into(), "body".into()],
            "Single-parameter function definition with docstring",
        )
        .expect("builtin function pattern is valid"),
    ]
}

/// Register every built-in pattern that is not already present.
///
/// Existing registrations win, so a caller's updated version of a built-in
/// id is never clobbered on reopen.
pub fn install_builtins<R: PatternRegistry + ?Sized>(registry: &R) -> RegistryResult<()> {
    for pattern in builtin_patterns() {
        if !registry.contains(&pattern.id)? {
            registry.register(&pattern)?;
        }
    }
    Ok(())
}
