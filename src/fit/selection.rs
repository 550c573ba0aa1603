//! Fit every formula and rank them using BIC with guardrails.
//!
//! For each model we compute:
//! - SSE / RMSE
//! - BIC = n * ln(SSE/n) + k * ln(n)
//!
//! Selection rules:
//! 1. Exclude underdetermined models: require `n >= k + 5`
//! 2. Choose the model with minimum BIC
//! 3. If a simpler model is within 2 BIC points of the best, pick the simpler model

use crate::domain::{FitQuality, FitResult, Formula, LogBounds, ModelKind, SamplePoint};
use crate::error::AppError;
use crate::fit::{ModelFit, fit_log, fit_polynomial};

/// Minimum number of extra observations beyond parameter count.
const MIN_N_BUFFER: usize = 5;

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct FitSelection {
    pub best: FitResult,
    /// Fits for all attempted models (after guardrails), simplest first.
    pub fits: Vec<FitResult>,
    /// Any models that were skipped and why (for diagnostics).
    pub skipped: Vec<(ModelKind, String)>,
}

impl FitSelection {
    pub fn get(&self, kind: ModelKind) -> Option<&FitResult> {
        self.fits.iter().find(|f| f.formula.kind == kind)
    }
}

/// Fit all formulas to the dataset and select the best.
pub fn fit_all(points: &[SamplePoint], bounds: &LogBounds) -> Result<FitSelection, AppError> {
    let n = points.len();
    let mut fits = Vec::new();
    let mut skipped = Vec::new();

    for kind in ModelKind::ALL {
        let k = kind.param_count();
        if n < k + MIN_N_BUFFER {
            skipped.push((
                kind,
                format!("Underdetermined: n={n} < k+{MIN_N_BUFFER}={}", k + MIN_N_BUFFER),
            ));
            continue;
        }

        let fit = match kind.degree() {
            Some(degree) => fit_polynomial(points, degree)?,
            None => fit_log(points, bounds)?,
        };
        tracing::debug!(model = kind.display_name(), sse = fit.sse, "fitted");
        fits.push(to_fit_result(fit, n));
    }

    if fits.is_empty() {
        return Err(AppError::insufficient(format!(
            "Insufficient data to fit any model after guardrails (n={n})."
        )));
    }

    let best = select_by_bic(&fits);
    Ok(FitSelection {
        best,
        fits,
        skipped,
    })
}

fn to_fit_result(fit: ModelFit, n: usize) -> FitResult {
    let k = fit.kind.param_count();
    FitResult {
        formula: Formula::new(fit.kind, fit.params),
        quality: FitQuality {
            sse: fit.sse,
            rmse: fit.rmse,
            bic: bic(n, fit.sse, k),
            n,
        },
    }
}

fn bic(n: usize, sse: f64, k: usize) -> f64 {
    let n_f = n as f64;
    let sse_per = (sse / n_f).max(1e-12);
    n_f * sse_per.ln() + (k as f64) * n_f.ln()
}

fn select_by_bic(fits: &[FitResult]) -> FitResult {
    let mut best = &fits[0];
    for f in &fits[1..] {
        if f.quality.bic < best.quality.bic {
            best = f;
        }
    }

    let best_bic = best.quality.bic;

    // Iterate in order of increasing complexity and pick the first fit that is
    // within 2 BIC points of the best.
    for kind in ModelKind::ALL {
        if let Some(f) = fits.iter().find(|f| f.formula.kind == kind) {
            if f.quality.bic <= best_bic + 2.0 {
                return f.clone();
            }
        }
    }

    best.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::find_line;

    fn result(kind: ModelKind, bic: f64) -> FitResult {
        FitResult {
            formula: Formula::new(kind, vec![]),
            quality: FitQuality {
                sse: 1.0,
                rmse: 1.0,
                bic,
                n: 100,
            },
        }
    }

    #[test]
    fn bic_prefers_simpler_when_close() {
        let fits = vec![result(ModelKind::Poly1, 10.0), result(ModelKind::Poly3, 8.5)];
        assert_eq!(select_by_bic(&fits).formula.kind, ModelKind::Poly1);
    }

    #[test]
    fn bic_picks_clear_winner() {
        let fits = vec![
            result(ModelKind::Poly1, 10.0),
            result(ModelKind::Log, 3.0),
            result(ModelKind::Poly2, 0.0),
        ];
        assert_eq!(select_by_bic(&fits).formula.kind, ModelKind::Poly2);
    }

    #[test]
    fn default_dataset_ranking() {
        let selection = fit_all(&find_line(), &LogBounds::default()).unwrap();
        assert_eq!(selection.fits.len(), 4);
        assert!(selection.skipped.is_empty());
        assert_eq!(selection.best.formula.kind, ModelKind::Poly3);

        let log = selection.get(ModelKind::Log).unwrap();
        assert!((log.quality.bic - (-657.983_771_912_567_6)).abs() < 1e-4);
        assert_eq!(log.quality.n, 1088);
    }

    #[test]
    fn tiny_dataset_skips_complex_models() {
        let points = &find_line()[..7];
        let selection = fit_all(points, &LogBounds::default()).unwrap();
        let kinds: Vec<ModelKind> = selection.fits.iter().map(|f| f.formula.kind).collect();
        assert_eq!(kinds, vec![ModelKind::Poly1, ModelKind::Log]);
        assert_eq!(selection.skipped.len(), 2);
    }

    #[test]
    fn empty_dataset_is_insufficient() {
        let err = fit_all(&[], &LogBounds::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
