//! Content-addressable store for Sigil.
//!
//! Arbitrary bytes are stored once, keyed by the domain-separated BLAKE3
//! hash of their content. Entries are immutable; storing the same bytes
//! twice is a no-op returning the same hash. Lookup accepts a full hash, an
//! unambiguous hash prefix, or a human-assigned alias.
//!
//! [`InMemoryContentStore`] backs tests and ephemeral use;
//! [`DirContentStore`] persists to an explicit directory with
//! write-then-rename crash safety.

pub mod dir;
pub mod error;
pub mod key;
pub mod memory;
pub mod traits;

pub use dir::DirContentStore;
pub use error::{StoreError, StoreResult};
pub use key::{validate_alias, MIN_PREFIX_LEN};
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
