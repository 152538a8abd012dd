//! The operator registry consulted by the tokenizer and the builder.

use crate::expr::{BinaryOp, UnaryOp};
use smol_str::SmolStr;
use std::collections::HashMap;

/// The table of every known operator sign and its metadata.
///
/// A registry is built once, never modified afterwards, and handed by
/// reference to both the tokenizer (for sign matching) and the shunting-yard
/// builder (for precedence and node construction). The [`Default`] registry
/// holds the standard arithmetic set plus the mutating increment.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    operations: HashMap<SmolStr, OperationInfo>,
}

/// Everything the parser needs to know about one operator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OperationInfo {
    /// Lower values bind tighter (`*` at 3 wins over `+` at 4).
    pub priority: u32,
    pub left_assoc: bool,
    pub kind: OperationKind,
}

/// Which tree node an operator constructs. The arity follows from this.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OperationKind {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl OperationInfo {
    /// How many operand subtrees this operation consumes.
    pub fn arity(&self) -> usize {
        match self.kind {
            OperationKind::Unary(_) => 1,
            OperationKind::Binary(_) => 2,
        }
    }
}

/// The result of testing a piece of text against the registered signs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SignMatch {
    /// No registered sign starts with this text.
    None,
    /// Not a sign itself, but some registered sign strictly extends it.
    Prefix,
    /// A registered sign.
    Exact,
}

impl Registry {
    /// A registry with no operators at all.
    pub fn empty() -> Self {
        Registry {
            operations: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        sign: &str,
        priority: u32,
        left_assoc: bool,
        kind: OperationKind,
    ) {
        self.operations.insert(
            sign.into(),
            OperationInfo {
                priority,
                left_assoc,
                kind,
            },
        );
    }

    /// Classify a candidate operator, letting the tokenizer extend a
    /// multi-character sign greedily instead of re-scanning from scratch.
    pub fn classify(&self, candidate: &str) -> SignMatch {
        if self.operations.contains_key(candidate) {
            return SignMatch::Exact;
        }

        let extends_candidate = self
            .operations
            .keys()
            .any(|sign| sign.len() > candidate.len() && sign.starts_with(candidate));

        if extends_candidate {
            SignMatch::Prefix
        } else {
            SignMatch::None
        }
    }

    /// Look up a sign the tokenizer already recognised. `None` means the
    /// tokenizer and the registry have fallen out of sync.
    pub fn lookup(&self, sign: &str) -> Option<&OperationInfo> {
        self.operations.get(sign)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register("+", 4, true, OperationKind::Binary(BinaryOp::Sum));
        registry.register("++", 1, false, OperationKind::Unary(UnaryOp::Increment));
        registry.register("-", 4, true, OperationKind::Binary(BinaryOp::Sub));
        registry.register("*", 3, true, OperationKind::Binary(BinaryOp::Mul));
        registry.register("/", 3, true, OperationKind::Binary(BinaryOp::Div));
        registry
    }
}
