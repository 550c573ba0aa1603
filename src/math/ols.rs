//! Least squares solver.
//!
//! Every fit in this crate reduces to a small linear problem
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with at most four columns: polynomial coefficients, or `(1/ln a, b)` for the
//! log model.
//!
//! We solve with SVD rather than QR because the design matrix is tall
//! (nalgebra's `QR::solve` expects square systems).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Sum of squared residuals `Σ (y_i - ŷ_i)^2`.
pub fn sum_squared_residuals(y: &[f64], y_fit: impl IntoIterator<Item = f64>) -> f64 {
    y.iter()
        .zip(y_fit)
        .map(|(&yi, fi)| {
            let r = yi - fi;
            r * r
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_overdetermined_mean() {
        // Intercept-only fit is the mean.
        let x = DMatrix::from_element(4, 1, 1.0);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 6.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sse_of_exact_fit_is_zero() {
        let y = [1.0, 2.0, 3.0];
        assert_eq!(sum_squared_residuals(&y, y.iter().copied()), 0.0);
        assert_eq!(sum_squared_residuals(&y, [0.0, 0.0, 0.0]), 14.0);
    }
}
