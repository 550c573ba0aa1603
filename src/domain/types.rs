//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during search and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One row of a cost table: the two cost estimates for a candidate grid size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRow {
    /// Candidate grid dimension (cells per axis).
    pub g: u64,
    /// Cost with unit weight on the per-cell pair term.
    pub best_1: u64,
    /// Cost with the per-cell pair term weighted by 16.
    pub best_16: u64,
    /// Mean of `best_1` and `best_16`; the objective minimized over `g`.
    pub avg: f64,
}

/// A single `(n, best_g)` observation of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub n: u64,
    pub best_g: u64,
}

/// Split a dataset into `(x, y)` float columns for regression.
pub fn split_xy(points: &[SamplePoint]) -> (Vec<f64>, Vec<f64>) {
    points
        .iter()
        .map(|p| (p.n as f64, p.best_g as f64))
        .unzip()
}

/// Largest problem size accepted anywhere user input reaches the search.
pub const MAX_N: u64 = 1_000_000_000;

/// Half-open range of sampled problem sizes: `start, start+step, ... < end`.
///
/// Deserialization goes through [`SampleRange::new`], so ranges reloaded from
/// a fits file are checked like ranges given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleRange")]
pub struct SampleRange {
    pub start: u64,
    pub end: u64,
    pub step: u64,
}

/// Dense sampling of small problem sizes.
pub const DEFAULT_DENSE: SampleRange = SampleRange {
    start: 2,
    end: 1000,
    step: 1,
};

/// Sparse sampling of large problem sizes.
pub const DEFAULT_SPARSE: SampleRange = SampleRange {
    start: 1000,
    end: 10_000,
    step: 100,
};

impl SampleRange {
    pub fn new(start: u64, end: u64, step: u64) -> Result<Self, AppError> {
        if start < 1 {
            return Err(AppError::invalid(format!(
                "Invalid sample range {start}:{end}:{step}: start must be >= 1."
            )));
        }
        if end <= start {
            return Err(AppError::invalid(format!(
                "Invalid sample range {start}:{end}:{step}: end must be > start."
            )));
        }
        if step == 0 {
            return Err(AppError::invalid(format!(
                "Invalid sample range {start}:{end}:{step}: step must be >= 1."
            )));
        }
        if end > MAX_N + 1 {
            return Err(AppError::invalid(format!(
                "Invalid sample range {start}:{end}:{step}: n must be <= {MAX_N}."
            )));
        }
        Ok(Self { start, end, step })
    }

    /// Number of sampled values.
    pub fn len(&self) -> usize {
        if self.end <= self.start || self.step == 0 {
            return 0;
        }
        ((self.end - self.start).div_ceil(self.step)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the sampled problem sizes in increasing order.
    pub fn values(&self) -> impl Iterator<Item = u64> + use<> {
        let step = self.step.max(1);
        (self.start..self.end).step_by(step as usize)
    }
}

impl fmt::Display for SampleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}

/// Unchecked wire form of [`SampleRange`].
#[derive(Deserialize)]
struct RawSampleRange {
    start: u64,
    end: u64,
    step: u64,
}

impl TryFrom<RawSampleRange> for SampleRange {
    type Error = AppError;

    fn try_from(raw: RawSampleRange) -> Result<Self, Self::Error> {
        SampleRange::new(raw.start, raw.end, raw.step)
    }
}

/// Parses `START:END` or `START:END:STEP` (step defaults to 1).
impl FromStr for SampleRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(parts.len() == 2 || parts.len() == 3) {
            return Err(AppError::invalid(format!(
                "Invalid sample range '{s}' (expected START:END[:STEP])."
            )));
        }
        let parse = |field: &str, label: &str| -> Result<u64, AppError> {
            field.trim().parse::<u64>().map_err(|e| {
                AppError::invalid(format!("Invalid {label} in sample range '{s}': {e}"))
            })
        };
        let start = parse(parts[0], "start")?;
        let end = parse(parts[1], "end")?;
        let step = match parts.get(2) {
            Some(field) => parse(field, "step")?,
            None => 1,
        };
        SampleRange::new(start, end, step)
    }
}

/// Ordered list of ranges whose results are concatenated into one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePlan {
    pub ranges: Vec<SampleRange>,
}

impl Default for SamplePlan {
    fn default() -> Self {
        Self {
            ranges: vec![DEFAULT_DENSE, DEFAULT_SPARSE],
        }
    }
}

impl SamplePlan {
    /// Use `ranges` if any were given, otherwise the default dense + sparse plan.
    pub fn from_ranges(ranges: &[SampleRange]) -> Self {
        if ranges.is_empty() {
            Self::default()
        } else {
            Self {
                ranges: ranges.to_vec(),
            }
        }
    }

    /// Total number of dataset rows the plan produces.
    pub fn total_len(&self) -> usize {
        self.ranges.iter().map(SampleRange::len).sum()
    }
}

impl fmt::Display for SamplePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// Which fitted formula to work with (overlays, exports, lookups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `c1*n + c0`
    Poly1,
    /// `c2*n^2 + c1*n + c0`
    Poly2,
    /// `c3*n^3 + c2*n^2 + c1*n + c0`
    Poly3,
    /// `log_a(n) + b`
    Log,
}

impl ModelKind {
    /// Fit order, simplest first.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Poly1,
        ModelKind::Log,
        ModelKind::Poly2,
        ModelKind::Poly3,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Poly1 => "deg 1",
            ModelKind::Poly2 => "deg 2",
            ModelKind::Poly3 => "deg 3",
            ModelKind::Log => "log",
        }
    }

    /// Polynomial degree, or `None` for the log model.
    pub fn degree(self) -> Option<usize> {
        match self {
            ModelKind::Poly1 => Some(1),
            ModelKind::Poly2 => Some(2),
            ModelKind::Poly3 => Some(3),
            ModelKind::Log => None,
        }
    }

    /// Number of free parameters (for information criteria).
    pub fn param_count(self) -> usize {
        match self.degree() {
            Some(d) => d + 1,
            None => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ModelKind::Poly1 => ModelKind::Poly2,
            ModelKind::Poly2 => ModelKind::Poly3,
            ModelKind::Poly3 => ModelKind::Log,
            ModelKind::Log => ModelKind::Poly1,
        }
    }
}

/// Bounds on the base `a` of the logarithmic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogBounds {
    pub a_min: f64,
    pub a_max: f64,
}

impl Default for LogBounds {
    fn default() -> Self {
        Self {
            a_min: 1.0,
            a_max: 10.0,
        }
    }
}

impl LogBounds {
    pub fn validate(&self) -> Result<(), AppError> {
        let LogBounds { a_min, a_max } = *self;
        if !(a_min.is_finite() && a_max.is_finite() && a_min >= 1.0 && a_max > a_min) {
            return Err(AppError::invalid(format!(
                "Invalid log base bounds: a_min={a_min}, a_max={a_max} \
                 (need 1 <= a_min < a_max, finite)."
            )));
        }
        Ok(())
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub bic: f64,
    pub n: usize,
}

/// Fitted formula parameters.
///
/// `params` layout:
/// - polynomials: coefficients lowest degree first (`[c0, c1, ...]`)
/// - log: `[a, b]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    pub kind: ModelKind,
    pub display_name: String,
    pub params: Vec<f64>,
}

/// Fit output for a single model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub formula: Formula,
    pub quality: FitQuality,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub plan: SamplePlan,
    pub log_bounds: LogBounds,

    /// Fitted curve drawn over the dataset (`None` picks the BIC winner).
    pub overlay: Option<ModelKind>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_dataset: Option<PathBuf>,
    pub export_fits: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            plan: SamplePlan::default(),
            log_bounds: LogBounds::default(),
            overlay: None,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_dataset: None,
            export_fits: None,
        }
    }
}

/// A saved fits file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitsFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub plan: SamplePlan,
    pub log_bounds: LogBounds,
    pub best: ModelKind,
    pub fits: Vec<FitResult>,
}
