//! Sequential COEF program execution.
//!
//! Execution threads a *current value* through the instruction sequence and
//! keeps a table of named bindings. Instructions that produce a value
//! (`literal`, `clone`, `inject`, `compose`, `swap`, `regex`) replace the
//! current value; `pipe` binds it under a name so later instructions can
//! reference it; `store` persists it and reports the hash. References
//! (`clone src=`, `compose left=/right=`) resolve against bindings first,
//! then against the content store by hash, prefix, or alias.
//!
//! `store` leaves the current value in place — content flows through the
//! whole program, so a terminal `verify:` trailer always checks the hash of
//! the final *content*. The hash produced by each `store` is recorded in
//! the outcome and, with `as=<name>`, bound for later reference.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use sigil_crypto::ContentHasher;
use sigil_registry::PatternRegistry;
use sigil_store::{ContentStore, StoreError};
use sigil_types::ContentHash;
use tracing::debug;

use crate::error::{CoefError, CoefResult};
use crate::instruction::CoefInstruction;
use crate::op::CoefOp;
use crate::program::CoefProgram;

/// The result of running a [`CoefProgram`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecOutcome {
    /// The final current value, if any instruction produced one.
    pub value: Option<String>,
    /// Full hash of the final value.
    pub final_hash: Option<ContentHash>,
    /// Hash of every entry written by a `store` instruction, in order.
    pub stored: Vec<ContentHash>,
}

/// Executes COEF programs against a pattern registry and content store.
pub struct CoefExecutor {
    registry: Arc<dyn PatternRegistry>,
    store: Arc<dyn ContentStore>,
}

/// Mutable state threaded through one program run.
struct RunState {
    current: Option<String>,
    bindings: HashMap<String, String>,
    stored: Vec<ContentHash>,
}

impl CoefExecutor {
    /// Create an executor over the given registry and store.
    pub fn new(registry: Arc<dyn PatternRegistry>, store: Arc<dyn ContentStore>) -> Self {
        Self { registry, store }
    }

    /// Run a program to completion.
    ///
    /// Execution is strictly sequential and deterministic. If the program
    /// carries a `verify` trailer and the final value's hash does not match,
    /// the run fails with [`CoefError::Verification`] — instruction chains
    /// are expected to guarantee correctness end-to-end.
    pub fn run(&self, program: &CoefProgram) -> CoefResult<ExecOutcome> {
        let mut state = RunState {
            current: None,
            bindings: HashMap::new(),
            stored: Vec::new(),
        };

        for instruction in &program.instructions {
            self.step(instruction, &mut state)?;
        }

        let final_hash = state
            .current
            .as_ref()
            .map(|value| ContentHasher::CONTENT.hash(value.as_bytes()));

        if let Some(expected) = &program.expected_hash {
            let computed = final_hash.ok_or(CoefError::NoCurrentValue {
                op: "verify".to_string(),
            })?;
            if !expected.matches(&computed) {
                return Err(CoefError::Verification {
                    expected: expected.to_hex(),
                    computed: computed.prefix().to_hex(),
                });
            }
        }

        Ok(ExecOutcome {
            value: state.current,
            final_hash,
            stored: state.stored,
        })
    }

    fn step(&self, instruction: &CoefInstruction, state: &mut RunState) -> CoefResult<()> {
        debug!(op = %instruction.op, args = instruction.args.len(), "coef step");
        match instruction.op {
            CoefOp::Literal => {
                let text = instruction.require("text")?;
                state.current = Some(text.to_string());
            }
            CoefOp::Clone => {
                let src = instruction.require("src")?;
                state.current = Some(self.resolve_ref(src, state)?);
            }
            CoefOp::Swap => {
                let from = instruction.require("from")?;
                let to = instruction.require("to")?;
                let current = take_current(state, instruction.op)?;
                state.current = Some(current.replace(from, to));
            }
            CoefOp::Inject => {
                let pattern_id = instruction.require("pattern")?;
                let pattern = self.registry.get(pattern_id)?;
                let anchors = instruction
                    .args
                    .iter()
                    .filter(|(k, _)| k.as_str() != "pattern")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                state.current = Some(pattern.render(&anchors)?);
            }
            CoefOp::Rename => {
                let from = instruction.require("from")?;
                let to = instruction.require("to")?;
                let hash = self.store.resolve_key(from)?;
                self.store.alias(to, &hash)?;
            }
            CoefOp::Regex => {
                let pattern = instruction.require("pattern")?;
                let replace = instruction.require("replace")?;
                let current = take_current(state, instruction.op)?;
                let re = Regex::new(pattern).map_err(|e| CoefError::InvalidRegex(e.to_string()))?;
                state.current = Some(re.replace_all(&current, replace).into_owned());
            }
            CoefOp::Compose => {
                let left = self.resolve_ref(instruction.require("left")?, state)?;
                let right = self.resolve_ref(instruction.require("right")?, state)?;
                let sep = instruction.args.get("sep").map(String::as_str).unwrap_or("");
                state.current = Some(format!("{left}{sep}{right}"));
            }
            CoefOp::Pipe => {
                let name = instruction.require("as")?;
                let current = current_ref(state, instruction.op)?.to_string();
                state.bindings.insert(name.to_string(), current);
            }
            CoefOp::Store => {
                let current = current_ref(state, instruction.op)?.to_string();
                let alias = instruction.args.get("name").map(String::as_str);
                let hash = self.store.store(current.as_bytes(), alias)?;
                if let Some(binding) = instruction.args.get("as") {
                    state.bindings.insert(binding.clone(), hash.to_hex());
                }
                state.stored.push(hash);
            }
        }
        Ok(())
    }

    /// Resolve a reference: bindings shadow store keys.
    fn resolve_ref(&self, key: &str, state: &RunState) -> CoefResult<String> {
        if let Some(value) = state.bindings.get(key) {
            return Ok(value.clone());
        }
        match self.store.resolve(key) {
            Ok(bytes) => String::from_utf8(bytes)
                .map_err(|_| CoefError::Unresolved(format!("{key} is not UTF-8 text"))),
            Err(StoreError::NotFound(_)) => Err(CoefError::Unresolved(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

fn current_ref(state: &RunState, op: CoefOp) -> CoefResult<&str> {
    state
        .current
        .as_deref()
        .ok_or_else(|| CoefError::NoCurrentValue { op: op.to_string() })
}

fn take_current(state: &mut RunState, op: CoefOp) -> CoefResult<String> {
    state
        .current
        .take()
        .ok_or_else(|| CoefError::NoCurrentValue { op: op.to_string() })
}

impl std::fmt::Debug for CoefExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoefExecutor").finish_non_exhaustive()
    }
}
