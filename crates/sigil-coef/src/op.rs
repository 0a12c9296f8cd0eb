use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoefError;

/// The fixed, closed COEF verb vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoefOp {
    /// Duplicate a stored value or binding into the current value.
    Clone,
    /// Substitute one substring for another in the current value.
    Swap,
    /// Render a registered pattern with the given anchors.
    Inject,
    /// Re-point a store alias.
    Rename,
    /// Apply a regular-expression transform to the current value.
    Regex,
    /// Combine two referenced values into one.
    Compose,
    /// Bind the current value under a name for later instructions.
    Pipe,
    /// Introduce a raw constant value.
    Literal,
    /// Persist the current value into the content store.
    Store,
}

impl CoefOp {
    /// All verbs, in vocabulary order.
    pub const ALL: [Self; 9] = [
        Self::Clone,
        Self::Swap,
        Self::Inject,
        Self::Rename,
        Self::Regex,
        Self::Compose,
        Self::Pipe,
        Self::Literal,
        Self::Store,
    ];

    /// The lowercase wire name of this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Swap => "swap",
            Self::Inject => "inject",
            Self::Rename => "rename",
            Self::Regex => "regex",
            Self::Compose => "compose",
            Self::Pipe => "pipe",
            Self::Literal => "literal",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for CoefOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoefOp {
    type Err = CoefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clone" => Ok(Self::Clone),
            "swap" => Ok(Self::Swap),
            "inject" => Ok(Self::Inject),
            "rename" => Ok(Self::Rename),
            "regex" => Ok(Self::Regex),
            "compose" => Ok(Self::Compose),
            "pipe" => Ok(Self::Pipe),
            "literal" => Ok(Self::Literal),
            "store" => Ok(Self::Store),
            other => Err(CoefError::UnknownOp(other.to_string())),
        }
    }
}
