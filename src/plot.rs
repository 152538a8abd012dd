//! Sample an [`Expression`] over a numeric range, e.g. to plot its graph.

use crate::{expr::VarSet, ops, EvaluationError, Expression};
use smol_str::SmolStr;

/// Walk `independent` from `min` to `max` (inclusive) in increments of
/// `step`, evaluating `expr` at each point and handing every `(x, y)` pair
/// to `sink`.
///
/// The bindings are taken by value: each sample overwrites the independent
/// variable, and any mutation the expression performs (e.g. `++`) stays
/// local to the sampling run. `step` must be positive.
pub fn sample<F>(
    expr: &Expression,
    mut variables: VarSet,
    independent: &str,
    min: f64,
    max: f64,
    step: f64,
    mut sink: F,
) -> Result<(), EvaluationError>
where
    F: FnMut(f64, f64),
{
    debug_assert!(step > 0.0, "a non-positive step would never terminate");

    let independent = SmolStr::from(independent);
    let mut x = min;

    while x <= max {
        variables.insert(independent.clone(), x);
        let y = ops::evaluate(expr, &mut variables)?;
        sink(x, y);

        x += step;
    }

    Ok(())
}
