//! Basis functions for the polynomial and logarithmic grid-size formulas.
//!
//! Polynomial design rows are built on a scaled abscissa `u = x / scale` so that
//! the columns of the design matrix stay within a few orders of magnitude of
//! each other (raw `n^3` reaches ~1e12 on the default dataset). Coefficients
//! solved in `u` are mapped back with [`unscale_coefficients`].

/// Fill `out` with `[1, u, u^2, ..., u^degree]`.
///
/// `out.len()` must be `degree + 1`.
pub fn poly_row(u: f64, out: &mut [f64]) {
    let mut p = 1.0;
    for v in out.iter_mut() {
        *v = p;
        p *= u;
    }
}

/// Evaluate a polynomial with coefficients lowest degree first (Horner).
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Map coefficients solved on `u = x / scale` back to coefficients in `x`.
pub fn unscale_coefficients(coeffs: &[f64], scale: f64) -> Vec<f64> {
    let mut factor = 1.0;
    coeffs
        .iter()
        .map(|&c| {
            let out = c / factor;
            factor *= scale;
            out
        })
        .collect()
}

/// `log_a(x)`.
pub fn log_base(x: f64, a: f64) -> f64 {
    x.ln() / a.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_row_powers() {
        let mut row = [0.0; 4];
        poly_row(2.0, &mut row);
        assert_eq!(row, [1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn horner_matches_expansion() {
        // 4 + 3x - 2x^2 + x^3 at x = 3 -> 4 + 9 - 18 + 27
        assert_eq!(horner(&[4.0, 3.0, -2.0, 1.0], 3.0), 22.0);
        assert_eq!(horner(&[], 3.0), 0.0);
    }

    #[test]
    fn unscale_roundtrip_value() {
        let scaled = [1.0, 2.0, 3.0];
        let scale = 10.0;
        let coeffs = unscale_coefficients(&scaled, scale);
        let x = 7.0;
        assert!((horner(&coeffs, x) - horner(&scaled, x / scale)).abs() < 1e-12);
    }

    #[test]
    fn log_base_known_values() {
        assert!((log_base(1000.0, 10.0) - 3.0).abs() < 1e-12);
        assert!((log_base(8.0, 2.0) - 3.0).abs() < 1e-12);
    }
}
