//! Regression of `best_g` against `n`.
//!
//! Responsibilities:
//!
//! - polynomial fits of degree 1, 2 and 3
//! - bounded logarithmic fit `log_a(n) + b`
//! - rank the fitted formulas using BIC + guardrails

pub mod log;
pub mod poly;
pub mod selection;

pub use log::*;
pub use poly::*;
pub use selection::*;

use crate::domain::ModelKind;

/// Raw fit for a single model kind, before quality scoring.
#[derive(Debug, Clone)]
pub struct ModelFit {
    pub kind: ModelKind,
    pub params: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
}
