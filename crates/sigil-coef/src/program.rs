use serde::{Deserialize, Serialize};
use sigil_types::HashPrefix;

use crate::error::{CoefError, CoefResult};
use crate::instruction::CoefInstruction;

/// Separator between instructions on the wire line.
const SEPARATOR: &str = " | ";

/// Prefix of the optional trailing verification segment.
const VERIFY_PREFIX: &str = "verify:";

/// An ordered sequence of COEF instructions plus an optional terminal
/// verification hash.
///
/// Wire form: instructions joined by `|`, optionally followed by a final
/// `verify:<hash16>` segment carrying the truncated hash the program's
/// final value must produce.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefProgram {
    /// The instructions, in execution order.
    pub instructions: Vec<CoefInstruction>,
    /// Expected hash of the final value, if the program carries one.
    pub expected_hash: Option<HashPrefix>,
}

impl CoefProgram {
    /// Construct a program with no verification trailer.
    pub fn new(instructions: Vec<CoefInstruction>) -> Self {
        Self {
            instructions,
            expected_hash: None,
        }
    }

    /// Attach a terminal verification hash.
    pub fn with_verify(mut self, expected: HashPrefix) -> Self {
        self.expected_hash = Some(expected);
        self
    }

    /// Serialize to the single-line wire form.
    pub fn to_wire(&self) -> String {
        let mut segments: Vec<String> = self
            .instructions
            .iter()
            .map(CoefInstruction::to_tokens)
            .collect();
        if let Some(expected) = &self.expected_hash {
            segments.push(format!("{VERIFY_PREFIX}{}", expected.to_hex()));
        }
        segments.join(SEPARATOR)
    }

    /// Parse the wire form back into a program.
    pub fn from_wire(text: &str) -> CoefResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoefError::MalformedWire("empty program".into()));
        }

        let mut instructions = Vec::new();
        let mut expected_hash = None;
        let segments: Vec<&str> = text.split('|').map(str::trim).collect();
        let last = segments.len() - 1;

        for (i, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                return Err(CoefError::MalformedWire("empty instruction segment".into()));
            }
            if let Some(hex) = segment.strip_prefix(VERIFY_PREFIX) {
                if i != last {
                    return Err(CoefError::MalformedWire(
                        "verify segment must come last".into(),
                    ));
                }
                let prefix = HashPrefix::from_hex(hex)
                    .map_err(|e| CoefError::MalformedWire(format!("bad verify hash: {e}")))?;
                expected_hash = Some(prefix);
            } else {
                instructions.push(CoefInstruction::from_tokens(segment)?);
            }
        }

        if instructions.is_empty() {
            return Err(CoefError::MalformedWire(
                "program has no instructions".into(),
            ));
        }
        Ok(Self {
            instructions,
            expected_hash,
        })
    }

    /// Whitespace-delimited token count of the wire form.
    ///
    /// A rough size metric used as a compactness signal, not a correctness
    /// contract.
    pub fn token_count(&self) -> usize {
        self.to_wire().split_whitespace().count()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::CoefOp;
    use proptest::prelude::*;
    use sigil_types::ContentHash;

    fn literal(text: &str) -> CoefInstruction {
        CoefInstruction::with_args(CoefOp::Literal, [("text", text)])
    }

    #[test]
    fn wire_form_matches_expected_shape() {
        let program = CoefProgram::new(vec![
            literal("hello"),
            CoefInstruction::bare(CoefOp::Store),
        ]);
        assert_eq!(program.to_wire(), "literal:text=hello | store:");
    }

    #[test]
    fn roundtrip_without_verify() {
        let program = CoefProgram::new(vec![
            literal("hello"),
            CoefInstruction::with_args(CoefOp::Swap, [("from", "h"), ("to", "j")]),
            CoefInstruction::bare(CoefOp::Store),
        ]);
        let parsed = CoefProgram::from_wire(&program.to_wire()).unwrap();
        assert_eq!(parsed, program);
    }

    #[test]
    fn roundtrip_with_verify() {
        let expected = ContentHash::from_bytes(b"final").prefix();
        let program = CoefProgram::new(vec![literal("final")]).with_verify(expected);
        let wire = program.to_wire();
        assert!(wire.ends_with(&format!("verify:{}", expected.to_hex())));
        let parsed = CoefProgram::from_wire(&wire).unwrap();
        assert_eq!(parsed, program);
        assert_eq!(parsed.expected_hash, Some(expected));
    }

    #[test]
    fn parse_spec_example() {
        let program = CoefProgram::from_wire("literal:text=hello | store:").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.instructions[0].op, CoefOp::Literal);
        assert_eq!(program.instructions[1].op, CoefOp::Store);
        assert_eq!(program.expected_hash, None);
    }

    #[test]
    fn reject_empty_program() {
        assert!(matches!(
            CoefProgram::from_wire("").unwrap_err(),
            CoefError::MalformedWire(_)
        ));
        assert!(matches!(
            CoefProgram::from_wire("   ").unwrap_err(),
            CoefError::MalformedWire(_)
        ));
    }

    #[test]
    fn reject_verify_only_program() {
        let err = CoefProgram::from_wire("verify:0011223344556677").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn reject_verify_in_the_middle() {
        let err =
            CoefProgram::from_wire("literal:text=a | verify:0011223344556677 | store:").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn reject_empty_segment() {
        let err = CoefProgram::from_wire("literal:text=a | | store:").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn reject_bad_verify_hash() {
        let err = CoefProgram::from_wire("literal:text=a | verify:xyz").unwrap_err();
        assert!(matches!(err, CoefError::MalformedWire(_)));
    }

    #[test]
    fn token_count_counts_whitespace_tokens() {
        let program = CoefProgram::new(vec![
            literal("hello"),
            CoefInstruction::bare(CoefOp::Store),
        ]);
        // "literal:text=hello | store:" → 3 tokens
        assert_eq!(program.token_count(), 3);
    }

    proptest! {
        #[test]
        fn wire_roundtrip_holds_for_arbitrary_programs(
            texts in proptest::collection::vec("\\PC*", 1..5),
            verify in proptest::option::of(proptest::array::uniform8(proptest::num::u8::ANY)),
        ) {
            let instructions = texts
                .iter()
                .map(|t| CoefInstruction::with_args(CoefOp::Literal, [("text", t.as_str())]))
                .collect();
            let mut program = CoefProgram::new(instructions);
            if let Some(bytes) = verify {
                program = program.with_verify(sigil_types::HashPrefix::from_raw(bytes));
            }
            let parsed = CoefProgram::from_wire(&program.to_wire()).unwrap();
            prop_assert_eq!(parsed, program);
        }
    }
}
