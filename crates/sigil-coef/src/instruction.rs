use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigil_types::wire;

use crate::error::{CoefError, CoefResult};
use crate::op::CoefOp;

/// Characters that delimit instruction tokens and must be escaped inside
/// argument keys and values: `:` ends the verb, ` ` separates pairs, `=`
/// splits a pair, and `|` separates instructions on the program line.
const RESERVED: &[char] = &[':', ' ', '=', '|'];

/// One COEF instruction: a verb plus named string arguments.
///
/// Token form: `op:key=value key=value`. Arguments are sorted by key; an
/// instruction with no arguments serializes as `op:`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefInstruction {
    /// The verb.
    pub op: CoefOp,
    /// Argument name → value.
    pub args: BTreeMap<String, String>,
}

impl CoefInstruction {
    /// Construct an instruction with no arguments.
    pub fn bare(op: CoefOp) -> Self {
        Self {
            op,
            args: BTreeMap::new(),
        }
    }

    /// Construct an instruction from `(key, value)` argument pairs.
    pub fn with_args<K, V>(op: CoefOp, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            op,
            args: args
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a required argument.
    pub fn require(&self, arg: &str) -> CoefResult<&str> {
        self.args
            .get(arg)
            .map(String::as_str)
            .ok_or_else(|| CoefError::MissingArg {
                op: self.op.to_string(),
                arg: arg.to_string(),
            })
    }

    /// Serialize to the `op:key=value key=value` token form.
    pub fn to_tokens(&self) -> String {
        let mut out = format!("{}:", self.op);
        let mut first = true;
        for (key, value) in &self.args {
            if !first {
                out.push(' ');
            }
            first = false;
            out.push_str(&wire::escape(key, RESERVED));
            out.push('=');
            out.push_str(&wire::escape(value, RESERVED));
        }
        out
    }

    /// Parse the token form back into an instruction.
    pub fn from_tokens(text: &str) -> CoefResult<Self> {
        let text = text.trim();
        let (op, rest) = text.split_once(':').ok_or_else(|| {
            CoefError::MalformedWire(format!("instruction without ':' after verb: {text:?}"))
        })?;
        let op: CoefOp = op.parse()?;

        let mut args = BTreeMap::new();
        for pair in rest.split_whitespace() {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                CoefError::MalformedWire(format!("argument without '=': {pair:?}"))
            })?;
            let key = wire::unescape(key).map_err(|e| CoefError::MalformedWire(e.to_string()))?;
            let value =
                wire::unescape(value).map_err(|e| CoefError::MalformedWire(e.to_string()))?;
            if key.is_empty() {
                return Err(CoefError::MalformedWire("empty argument key".into()));
            }
            if args.insert(key.clone(), value).is_some() {
                return Err(CoefError::MalformedWire(format!(
                    "duplicate argument key {key:?}"
                )));
            }
        }
        Ok(Self { op, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_instruction_tokens() {
        let instr = CoefInstruction::bare(CoefOp::Store);
        assert_eq!(instr.to_tokens(), "store:");
        assert_eq!(CoefInstruction::from_tokens("store:").unwrap(), instr);
    }

    #[test]
    fn instruction_with_args_tokens() {
        let instr = CoefInstruction::with_args(CoefOp::Literal, [("text", "hello")]);
        assert_eq!(instr.to_tokens(), "literal:text=hello");
        assert_eq!(
            CoefInstruction::from_tokens("literal:text=hello").unwrap(),
            instr
        );
    }

    #[test]
    fn args_serialize_sorted() {
        let instr = CoefInstruction::with_args(CoefOp::Swap, [("to", "y"), ("from", "x")]);
        assert_eq!(instr.to_tokens(), "swap:from=x to=y");
    }

    #[test]
    fn values_with_delimiters_roundtrip() {
        let instr = CoefInstruction::with_args(
            CoefOp::Literal,
            [("text", "a=b c:d|e 100%")],
        );
        let tokens = instr.to_tokens();
        assert!(!tokens.contains('|'));
        assert_eq!(CoefInstruction::from_tokens(&tokens).unwrap(), instr);
    }

    #[test]
    fn reject_unknown_verb() {
        let err = CoefInstruction::from_tokens("frobnicate:x=1").unwrap_err();
        assert!(matches!(err, CoefError::UnknownOp(_)));
    }

    #[test]
    fn reject_missing_colon() {
        let err = CoefInstruction::from_tokens("store").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn reject_pair_without_equals() {
        let err = CoefInstruction::from_tokens("literal:text").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn reject_duplicate_args() {
        let err = CoefInstruction::from_tokens("literal:a=1 a=2").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn require_reports_missing_arg() {
        let instr = CoefInstruction::bare(CoefOp::Literal);
        let err = instr.require("text").unwrap_err();
        assert!(matches!(err, CoefError::MissingArg { op, arg } if op == "literal" && arg == "text"));
    }
}
