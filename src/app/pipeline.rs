//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sampling plan -> brute-force search per n -> dataset -> fits -> selection
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::time::Instant;

use crate::domain::{FitConfig, SamplePlan, SamplePoint};
use crate::error::AppError;
use crate::fit::{FitSelection, fit_all};
use crate::search::find_line_with;

/// All computed outputs of a single `gridfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub plan: SamplePlan,
    pub points: Vec<SamplePoint>,
    pub selection: FitSelection,
}

/// Generate the dataset for `plan`.
pub fn run_sample(plan: &SamplePlan) -> Vec<SamplePoint> {
    let started = Instant::now();
    let points = find_line_with(plan);
    tracing::info!(
        points = points.len(),
        plan = %plan,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sampled dataset"
    );
    points
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    config.log_bounds.validate()?;

    let points = run_sample(&config.plan);
    let selection = fit_all(&points, &config.log_bounds)?;
    tracing::info!(
        best = selection.best.formula.kind.display_name(),
        fits = selection.fits.len(),
        skipped = selection.skipped.len(),
        "fitted formulas"
    );

    Ok(RunOutput {
        plan: config.plan.clone(),
        points,
        selection,
    })
}
