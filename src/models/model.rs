//! Formula evaluation for the polynomial and logarithmic models.

use crate::domain::{Formula, ModelKind};
use crate::math::{horner, log_base};

/// Predict `best_g` at problem size `x`.
///
/// `params` follows the `Formula` layout: polynomial coefficients lowest
/// degree first, or `[a, b]` for the log model.
pub fn predict(kind: ModelKind, x: f64, params: &[f64]) -> f64 {
    match kind {
        ModelKind::Poly1 | ModelKind::Poly2 | ModelKind::Poly3 => horner(params, x),
        ModelKind::Log => match params {
            [a, b, ..] => log_base(x, *a) + b,
            _ => f64::NAN,
        },
    }
}

impl Formula {
    pub fn new(kind: ModelKind, params: Vec<f64>) -> Self {
        Self {
            kind,
            display_name: kind.display_name().to_string(),
            params,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        predict(self.kind, x, &self.params)
    }

    /// Human-readable expression, polynomial terms highest degree first.
    pub fn expression(&self) -> String {
        match self.kind {
            ModelKind::Log => match self.params.as_slice() {
                [a, b, ..] => format!("log(n, {a:.7}) {} {:.8}", sign(*b), b.abs()),
                _ => "log(n, ?)".to_string(),
            },
            _ => {
                let mut terms = Vec::with_capacity(self.params.len());
                for (power, c) in self.params.iter().enumerate().rev() {
                    let term = match power {
                        0 => format!("{c:.8e}"),
                        1 => format!("({c:.8e} * n)"),
                        p => format!("({c:.8e} * n^{p})"),
                    };
                    terms.push(term);
                }
                terms.join(" + ")
            }
        }
    }
}

fn sign(v: f64) -> char {
    if v < 0.0 { '-' } else { '+' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_polynomial_lowest_first() {
        // 5 + 2n
        assert_eq!(predict(ModelKind::Poly1, 10.0, &[5.0, 2.0]), 25.0);
        // 1 + 0n + 1n^2
        assert_eq!(predict(ModelKind::Poly2, 3.0, &[1.0, 0.0, 1.0]), 10.0);
    }

    #[test]
    fn predict_log() {
        let y = predict(ModelKind::Log, 100.0, &[10.0, 1.5]);
        assert!((y - 3.5).abs() < 1e-12);
        assert!(predict(ModelKind::Log, 100.0, &[10.0]).is_nan());
    }

    #[test]
    fn expression_lists_highest_degree_first() {
        let f = Formula::new(ModelKind::Poly2, vec![3.0, 2.0, 1.0]);
        assert_eq!(
            f.expression(),
            "(1.00000000e0 * n^2) + (2.00000000e0 * n) + 3.00000000e0"
        );
        let f = Formula::new(ModelKind::Log, vec![1.6572725, -3.89293267]);
        assert_eq!(f.expression(), "log(n, 1.6572725) - 3.89293267");
    }
}
