//! Ordinary least squares polynomial fits of `best_g` against `n`.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ModelKind, SamplePoint, split_xy};
use crate::error::AppError;
use crate::fit::ModelFit;
use crate::math::{
    horner, poly_row, solve_least_squares, sum_squared_residuals, unscale_coefficients,
};

/// Polynomial model kind for `degree` (1..=3).
pub fn polynomial_kind(degree: usize) -> Option<ModelKind> {
    match degree {
        1 => Some(ModelKind::Poly1),
        2 => Some(ModelKind::Poly2),
        3 => Some(ModelKind::Poly3),
        _ => None,
    }
}

/// Fit a polynomial of the given degree to the dataset.
pub fn fit_polynomial(points: &[SamplePoint], degree: usize) -> Result<ModelFit, AppError> {
    let Some(kind) = polynomial_kind(degree) else {
        return Err(AppError::invalid(format!(
            "Unsupported polynomial degree {degree} (expected 1, 2 or 3)."
        )));
    };
    let (x, y) = split_xy(points);
    fit_polynomial_xy(kind, &x, &y)
}

/// Fit a polynomial model to raw columns.
///
/// Coefficients are returned lowest degree first.
pub fn fit_polynomial_xy(kind: ModelKind, x: &[f64], y: &[f64]) -> Result<ModelFit, AppError> {
    let Some(degree) = kind.degree() else {
        return Err(AppError::invalid(format!(
            "{} is not a polynomial model.",
            kind.display_name()
        )));
    };
    if x.len() != y.len() {
        return Err(AppError::invalid(format!(
            "Mismatched columns: {} x values, {} y values.",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    let p = degree + 1;
    if n < p {
        return Err(AppError::insufficient(format!(
            "Polynomial {} needs at least {p} points, got {n}.",
            kind.display_name()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::invalid("Non-finite value in regression input."));
    }

    let scale = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let scale = if scale > 0.0 { scale } else { 1.0 };

    let mut design = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &xi) in x.iter().enumerate() {
        poly_row(xi / scale, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or_else(|| {
        AppError::numeric(format!(
            "Least squares failed for polynomial {}.",
            kind.display_name()
        ))
    })?;
    let params = unscale_coefficients(beta.as_slice(), scale);

    let sse = sum_squared_residuals(y, x.iter().map(|&xi| horner(&params, xi)));
    if !sse.is_finite() {
        return Err(AppError::numeric(format!(
            "Non-finite residuals for polynomial {}.",
            kind.display_name()
        )));
    }

    Ok(ModelFit {
        kind,
        params,
        sse,
        rmse: (sse / n as f64).sqrt(),
    })
}
