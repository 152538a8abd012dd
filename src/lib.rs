//! An infix arithmetic expression engine.
//!
//! Source text is tokenized against a [`Registry`] of operator signs,
//! assembled into an [`Expression`] tree by the shunting-yard algorithm,
//! and the tree can then be printed, evaluated against a set of variable
//! bindings, or symbolically differentiated.
//!
//! ```rust
//! use shunting::{Expression, VarSet};
//!
//! let expr: Expression = "x * x".parse()?;
//!
//! let mut variables = VarSet::new();
//! variables.insert("x".into(), 3.0);
//!
//! assert_eq!(expr.evaluate(&mut variables)?, 9.0);
//! assert_eq!(expr.differentiate().evaluate(&mut variables)?, 6.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod expr;
pub mod ops;
mod parse;
pub mod plot;
mod registry;

pub use expr::{BinaryOp, Expression, UnaryOp, VarSet};
pub use ops::EvaluationError;
pub use parse::{parse, ParseError};
pub use registry::{OperationInfo, OperationKind, Registry, SignMatch};
