//! Pattern registry for Sigil.
//!
//! A [`Pattern`] is a named template with a fixed set of slots, representing
//! one recognized shape of content. Registries hold patterns by id:
//! [`InMemoryPatternRegistry`] for tests and ephemeral use,
//! [`DirPatternRegistry`] for durable, directory-backed registration that
//! survives process restarts.
//!
//! Template syntax: `{slot}` marks a placeholder; `{{` and `}}` are literal
//! braces. Registration fails if the template's placeholders and the
//! declared slot list disagree in either direction.

pub mod builtin;
pub mod dir;
pub mod error;
pub mod memory;
pub mod names;
pub mod pattern;
pub mod template;
pub mod traits;

pub use builtin::{builtin_patterns, install_builtins};
pub use dir::DirPatternRegistry;
pub use error::{RegistryError, RegistryResult};
pub use memory::InMemoryPatternRegistry;
pub use pattern::Pattern;
pub use template::{placeholders, render, TemplateSegment};
pub use traits::PatternRegistry;
