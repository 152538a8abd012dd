//! [`Expression`] operations: evaluation, mutation and symbolic
//! differentiation.

use crate::expr::{BinaryOp, Expression, UnaryOp, VarSet};
use smol_str::SmolStr;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Things that can go wrong while evaluating an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// A variable was read but never bound. Recoverable: bind the name and
    /// evaluate again.
    UndefinedVariable { name: SmolStr },
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::UndefinedVariable { name } => {
                write!(f, "The variable \"{}\" is not set", name)
            },
        }
    }
}

impl Error for EvaluationError {}

/// Evaluate an expression against some variable bindings.
///
/// The bindings are borrowed mutably because evaluation can have side
/// effects: `++x` increments the stored value of `x` in place. Division by
/// zero is not guarded against; it produces the usual IEEE-754 infinity or
/// NaN.
pub fn evaluate(
    expr: &Expression,
    variables: &mut VarSet,
) -> Result<f64, EvaluationError> {
    match expr {
        Expression::Constant(value) => Ok(*value),
        Expression::Variable(name) => variables.get(name).copied().ok_or_else(
            || EvaluationError::UndefinedVariable { name: name.clone() },
        ),
        Expression::Unary {
            op: UnaryOp::Increment,
            argument,
        } => {
            let value = evaluate(argument, variables)? + 1.0;
            set_value(argument, variables, value);
            Ok(value)
        },
        Expression::Binary { left, right, op } => {
            let left = evaluate(left, variables)?;
            let right = evaluate(right, variables)?;

            Ok(match op {
                BinaryOp::Sum => left + right,
                BinaryOp::Sub => left - right,
                BinaryOp::Mul => left * right,
                BinaryOp::Div => left / right,
            })
        },
    }
}

/// Store `value` into the binding a node stands for.
///
/// Only a [`Expression::Variable`] actually writes anything; every other
/// node silently ignores the request, so incrementing a non-variable (say
/// `++(x*2)`) evaluates fine but updates nothing.
pub fn set_value(expr: &Expression, variables: &mut VarSet, value: f64) {
    if let Expression::Variable(name) = expr {
        variables.insert(name.clone(), value);
    }
}

/// Calculate an expression's symbolic derivative.
///
/// The result is a brand new tree sharing no nodes with the source; where a
/// rule reuses an operand (product and quotient rules) the subtree is
/// cloned. No simplification is attempted, so expect shapes like
/// `((1*x)+(x*1))` rather than `(2*x)`.
pub fn differentiate(expr: &Expression) -> Expression {
    match expr {
        Expression::Constant(_) => Expression::Constant(0.0),
        Expression::Variable(_) => Expression::Constant(1.0),
        // incrementing only shifts a value, so the derivative is the
        // argument's derivative
        Expression::Unary {
            op: UnaryOp::Increment,
            argument,
        } => differentiate(argument),
        Expression::Binary { left, right, op } => match op {
            BinaryOp::Sum => differentiate(left) + differentiate(right),
            BinaryOp::Sub => differentiate(left) - differentiate(right),
            BinaryOp::Mul => {
                // The product rule
                differentiate(left) * Expression::clone(right)
                    + Expression::clone(left) * differentiate(right)
            },
            BinaryOp::Div => {
                // The quotient rule
                let denominator = Expression::clone(right);

                (differentiate(left) * denominator.clone()
                    - Expression::clone(left) * differentiate(right))
                    / (denominator.clone() * denominator)
            },
        },
    }
}

impl Expression {
    /// Method form of [`evaluate()`].
    pub fn evaluate(
        &self,
        variables: &mut VarSet,
    ) -> Result<f64, EvaluationError> {
        evaluate(self, variables)
    }

    /// Method form of [`differentiate()`].
    pub fn differentiate(&self) -> Expression { differentiate(self) }

    /// Method form of [`set_value()`].
    pub fn set_value(&self, variables: &mut VarSet, value: f64) {
        set_value(self, variables, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, f64)]) -> VarSet {
        pairs
            .iter()
            .map(|(name, value)| (SmolStr::from(*name), *value))
            .collect()
    }

    #[test]
    fn evaluate_simple_arithmetic() {
        let inputs = vec![
            ("1", 1.0),
            ("1 + 1.5", 1.0 + 1.5),
            ("1 - 1.5", 1.0 - 1.5),
            ("2 * 3", 2.0 * 3.0),
            ("4 / 2", 4.0 / 2.0),
            ("2 + 3 * 4", 14.0),
            ("(2 + 3) * 4", 20.0),
            ("8 - 3 - 2", 3.0),
            ("10 / 5 / 2", 1.0),
        ];

        for (src, should_be) in inputs {
            let expr: Expression = src.parse().unwrap();
            let got = evaluate(&expr, &mut VarSet::new()).unwrap();

            assert_eq!(got, should_be, "{} != {}", src, should_be);
        }
    }

    #[test]
    fn evaluate_reads_the_bindings() {
        let expr: Expression = "x + 1".parse().unwrap();

        let mut variables = bindings(&[("x", 5.0)]);
        assert_eq!(evaluate(&expr, &mut variables).unwrap(), 6.0);

        let got = evaluate(&expr, &mut VarSet::new());
        assert_eq!(
            got,
            Err(EvaluationError::UndefinedVariable { name: "x".into() })
        );
    }

    #[test]
    fn thirds_need_an_approximate_comparison() {
        let expr: Expression = "x / 3".parse().unwrap();
        let mut variables = bindings(&[("x", 1.0)]);

        let got = evaluate(&expr, &mut variables).unwrap();

        assert!(approx::relative_eq!(got, 1.0 / 3.0));
    }

    #[test]
    fn division_by_zero_is_not_guarded() {
        let mut variables = VarSet::new();

        let expr: Expression = "1 / 0".parse().unwrap();
        assert!(evaluate(&expr, &mut variables).unwrap().is_infinite());

        let expr: Expression = "0 / 0".parse().unwrap();
        assert!(evaluate(&expr, &mut variables).unwrap().is_nan());
    }

    #[test]
    fn increment_mutates_its_variable() {
        let expr: Expression = "++x".parse().unwrap();
        let mut variables = bindings(&[("x", 4.0)]);

        let got = evaluate(&expr, &mut variables).unwrap();

        assert_eq!(got, 5.0);
        assert_eq!(variables["x"], 5.0);
    }

    #[test]
    fn increment_of_a_non_variable_evaluates_but_mutates_nothing() {
        let expr: Expression = "++(x * 2)".parse().unwrap();
        let mut variables = bindings(&[("x", 3.0)]);

        let got = evaluate(&expr, &mut variables).unwrap();

        assert_eq!(got, 7.0);
        assert_eq!(variables, bindings(&[("x", 3.0)]));
    }

    #[test]
    fn set_value_only_writes_through_variables() {
        let mut variables = VarSet::new();

        set_value(&Expression::Variable("x".into()), &mut variables, 1.5);
        assert_eq!(variables, bindings(&[("x", 1.5)]));

        set_value(&Expression::Constant(7.0), &mut variables, 9.0);
        assert_eq!(variables, bindings(&[("x", 1.5)]));
    }

    #[test]
    fn differentiate_leaves() {
        assert_eq!(
            differentiate(&Expression::Constant(3.0)),
            Expression::Constant(0.0)
        );
        assert_eq!(
            differentiate(&Expression::Variable("x".into())),
            Expression::Constant(1.0)
        );
    }

    #[test]
    fn derivatives_evaluated_at_a_point() {
        // every input differentiates to a tree we then evaluate at x = 3
        let inputs = vec![
            ("3", 0.0),
            ("x", 1.0),
            ("x + x", 2.0),
            ("x - 2", 1.0),
            ("x * x", 6.0),   // d(x^2) = 2x
            ("x * x * x", 27.0), // d(x^3) = 3x^2
            ("2 * x + 5", 2.0),
            ("++x", 1.0),
            ("1 / x", -1.0 / 9.0),
        ];

        for (src, should_be) in inputs {
            let expr: Expression = src.parse().unwrap();
            let derivative = differentiate(&expr);

            let mut variables = bindings(&[("x", 3.0)]);
            let got = evaluate(&derivative, &mut variables).unwrap();

            assert!(
                approx::relative_eq!(got, should_be),
                "d({}) at x=3 gave {}, not {}",
                src,
                got,
                should_be
            );
        }
    }

    #[test]
    fn quotient_rule_uses_both_operands() {
        let expr: Expression = "x / y".parse().unwrap();
        let derivative = differentiate(&expr);

        // d/dx (x/y) = (y - x * dy/dx) / y^2, and dy/dx is 1 here because
        // every variable differentiates to 1
        let mut variables = bindings(&[("x", 4.0), ("y", 2.0)]);
        let got = evaluate(&derivative, &mut variables).unwrap();

        assert_eq!(got, (2.0 - 4.0) / (2.0 * 2.0));
    }

    #[test]
    fn differentiation_does_not_disturb_the_source_tree() {
        let expr: Expression = "x * (x + 2)".parse().unwrap();
        let before = expr.clone();

        let _ = differentiate(&expr);

        assert_eq!(expr, before);
    }

    #[test]
    fn derivative_of_a_product_keeps_the_expected_shape() {
        let expr: Expression = "x * x".parse().unwrap();

        let got = differentiate(&expr).to_string();

        assert_eq!(got, "((1*x)+(x*1))");
    }
}
