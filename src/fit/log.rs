//! Bounded fit of `f(x) = log_a(x) + b`.
//!
//! The model is linear in `c = 1/ln(a)` and `b`:
//!
//! ```text
//! f(x) = c * ln(x) + b
//! ```
//!
//! The bound `a ∈ [a_min, a_max]` becomes `c ∈ [1/ln(a_max), 1/ln(a_min)]`
//! (the upper end is unbounded when `a_min = 1`). With `b` profiled out the
//! objective is a convex quadratic in `c`, so projecting the unconstrained
//! solution onto the interval gives the constrained optimum. When the bound is
//! active, `b` is refitted with `c` fixed by moving the known term to the
//! left-hand side.

use nalgebra::{DMatrix, DVector};

use crate::domain::{LogBounds, ModelKind, SamplePoint, split_xy};
use crate::error::AppError;
use crate::fit::ModelFit;
use crate::math::{solve_least_squares, sum_squared_residuals};
use crate::models::predict;

/// Fit the log model to the dataset.
pub fn fit_log(points: &[SamplePoint], bounds: &LogBounds) -> Result<ModelFit, AppError> {
    let (x, y) = split_xy(points);
    fit_log_xy(&x, &y, bounds)
}

/// Fit the log model to raw columns. Returns `params = [a, b]`.
pub fn fit_log_xy(x: &[f64], y: &[f64], bounds: &LogBounds) -> Result<ModelFit, AppError> {
    bounds.validate()?;
    if x.len() != y.len() {
        return Err(AppError::invalid(format!(
            "Mismatched columns: {} x values, {} y values.",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AppError::insufficient(format!(
            "Log fit needs at least 2 points, got {n}."
        )));
    }
    if x.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return Err(AppError::invalid("Log fit requires finite x > 0."));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::invalid("Non-finite value in regression input."));
    }

    let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();

    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &l) in ln_x.iter().enumerate() {
        design[(i, 0)] = l;
        design[(i, 1)] = 1.0;
    }
    let beta = solve_least_squares(&design, &DVector::from_column_slice(y))
        .ok_or_else(|| AppError::numeric("Least squares failed for log model."))?;

    let (c_lo, c_hi) = slope_bounds(bounds);
    let c_free = beta[0];
    let c = c_free.clamp(c_lo, c_hi);
    let b = if c == c_free {
        beta[1]
    } else {
        tracing::debug!(c_free, c, "log base bound active");
        refit_offset(&ln_x, y, c)?
    };

    let a = (1.0 / c).exp();
    let params = vec![a, b];
    let sse = sum_squared_residuals(y, x.iter().map(|&xi| predict(ModelKind::Log, xi, &params)));
    if !(a.is_finite() && sse.is_finite()) {
        return Err(AppError::numeric(format!(
            "Non-finite log fit (a={a}, b={b})."
        )));
    }

    Ok(ModelFit {
        kind: ModelKind::Log,
        params,
        sse,
        rmse: (sse / n as f64).sqrt(),
    })
}

/// `[1/ln(a_max), 1/ln(a_min)]`, with `+∞` for `a_min = 1`.
fn slope_bounds(bounds: &LogBounds) -> (f64, f64) {
    let lo = 1.0 / bounds.a_max.ln();
    let hi = if bounds.a_min > 1.0 {
        1.0 / bounds.a_min.ln()
    } else {
        f64::INFINITY
    };
    (lo, hi)
}

/// Least squares offset for `y - c*ln(x) = b`.
fn refit_offset(ln_x: &[f64], y: &[f64], c: f64) -> Result<f64, AppError> {
    let n = y.len();
    let design = DMatrix::<f64>::from_element(n, 1, 1.0);
    let adjusted = DVector::from_iterator(n, y.iter().zip(ln_x).map(|(&yi, &l)| yi - c * l));
    let beta = solve_least_squares(&design, &adjusted)
        .ok_or_else(|| AppError::numeric("Least squares failed for log offset."))?;
    Ok(beta[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{REFERENCE_LOG_A, REFERENCE_LOG_B};
    use crate::search::find_line;

    #[test]
    fn recovers_exact_log_curve() {
        let x: Vec<f64> = (2..200).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| v.ln() / 3.0_f64.ln() - 2.0).collect();
        let fit = fit_log_xy(&x, &y, &LogBounds::default()).unwrap();
        assert!((fit.params[0] - 3.0).abs() < 1e-9, "{:?}", fit.params);
        assert!((fit.params[1] + 2.0).abs() < 1e-9, "{:?}", fit.params);
    }

    #[test]
    fn default_dataset_reproduces_recorded_constants() {
        let fit = fit_log(&find_line(), &LogBounds::default()).unwrap();
        assert!((fit.params[0] - REFERENCE_LOG_A).abs() < 1e-6, "a = {}", fit.params[0]);
        assert!((fit.params[1] - REFERENCE_LOG_B).abs() < 1e-6, "b = {}", fit.params[1]);
        assert!((fit.sse - 586.679_581_322_664_3).abs() < 1e-6);
    }

    #[test]
    fn base_clamped_to_upper_bound() {
        // True base 20 lies outside [1, 10].
        let x: Vec<f64> = (2..100).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| v.ln() / 20.0_f64.ln() + 1.0).collect();
        let fit = fit_log_xy(&x, &y, &LogBounds::default()).unwrap();
        assert!((fit.params[0] - 10.0).abs() < 1e-9);

        let c = 1.0 / 10.0_f64.ln();
        let expected_b = x
            .iter()
            .zip(&y)
            .map(|(&xi, &yi)| yi - c * xi.ln())
            .sum::<f64>()
            / x.len() as f64;
        assert!((fit.params[1] - expected_b).abs() < 1e-9);
    }

    #[test]
    fn base_clamped_to_lower_bound() {
        let bounds = LogBounds { a_min: 4.0, a_max: 10.0 };
        let x: Vec<f64> = (2..100).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| v.ln() / 2.0_f64.ln()).collect();
        let fit = fit_log_xy(&x, &y, &bounds).unwrap();
        assert!((fit.params[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_x() {
        let err =
            fit_log_xy(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], &LogBounds::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
