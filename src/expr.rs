use smol_str::SmolStr;
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Sub},
};

/// The bindings a tree is evaluated against: variable name to value.
///
/// The same map is threaded mutably through an entire evaluation so that
/// side effects (e.g. [`UnaryOp::Increment`]) are visible to the caller
/// afterwards.
pub type VarSet = HashMap<SmolStr, f64>;

/// An expression tree.
///
/// Every child is owned exclusively by its parent, so dropping a tree drops
/// all of its subtrees and no node can appear in two trees at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(f64),
    Variable(SmolStr),
    /// An operation with a single operand.
    Unary {
        op: UnaryOp,
        argument: Box<Expression>,
    },
    /// An operation involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOp,
    },
}

impl Expression {
    pub fn unary(op: UnaryOp, argument: Expression) -> Self {
        Expression::Unary {
            op,
            argument: Box::new(argument),
        }
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }
}

/// An operation applied to a single operand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UnaryOp {
    Increment,
}

impl UnaryOp {
    /// The literal text identifying this operation in source form.
    pub fn sign(self) -> &'static str {
        match self {
            UnaryOp::Increment => "++",
        }
    }
}

/// An operation that can be applied to two operands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryOp {
    Sum,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// The literal text identifying this operation in source form.
    pub fn sign(self) -> &'static str {
        match self {
            BinaryOp::Sum => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOp::Sum, rhs)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOp::Sub, rhs)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOp::Mul, rhs)
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOp::Div, rhs)
    }
}

impl Display for Expression {
    /// Prints the fully parenthesized form, which always parses back to the
    /// same tree: binary nodes as `(left sign right)`, unary nodes as
    /// `sign(argument)`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // integers print without a fractional part ("3", not "3.0")
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Unary { op, argument } => {
                write!(f, "{}({})", op, argument)
            },
            Expression::Binary { left, right, op } => {
                write!(f, "({}{}{})", left, op, right)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let inputs = vec![
            (Expression::Constant(3.0), "3"),
            (Expression::Constant(3.14), "3.14"),
            (Expression::Variable("velocity".into()), "velocity"),
            (
                Expression::unary(
                    UnaryOp::Increment,
                    Expression::Variable("x".into()),
                ),
                "++(x)",
            ),
            (
                Expression::binary(
                    Expression::Constant(1.0),
                    BinaryOp::Sum,
                    Expression::Constant(2.0),
                ),
                "(1+2)",
            ),
            (
                Expression::binary(
                    Expression::binary(
                        Expression::Constant(1.0),
                        BinaryOp::Sub,
                        Expression::Variable("x".into()),
                    ),
                    BinaryOp::Div,
                    Expression::Constant(3.0),
                ),
                "((1-x)/3)",
            ),
            (
                Expression::Constant(2.0) * Expression::Variable("x".into()),
                "(2*x)",
            ),
        ];

        for (expr, should_be) in inputs {
            let got = expr.to_string();
            assert_eq!(got, should_be);
        }
    }

    #[test]
    fn trees_compare_structurally() {
        let left = Expression::Constant(1.0) + Expression::Variable("x".into());
        let right =
            Expression::Constant(1.0) + Expression::Variable("x".into());

        assert_eq!(left, right);
        assert_ne!(left, right.clone() * Expression::Constant(1.0));
    }
}
