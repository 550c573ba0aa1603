//! Command-line parsing for the grid-size estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the search/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{LogBounds, MAX_N, ModelKind, SampleRange};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gridfit", version, about = "Empirical grid-size formula estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the cost table for one problem size and compare the recorded formulas.
    Table(TableArgs),
    /// Generate the (n, best_g) dataset and print a summary.
    Sample(SampleArgs),
    /// Fit polynomial and log formulas to the dataset, print diagnostics, and
    /// optionally plot/export.
    Fit(FitArgs),
    /// Plot the dataset with a formula from a saved fits JSON.
    Plot(PlotArgs),
    /// Launch the interactive chart.
    Tui(TuiArgs),
    /// Compare grid sizes from the log rule with ceil(sqrt(n)) and the search.
    GridSize(GridSizeArgs),
}

/// Sampling plan override.
#[derive(Debug, Args, Clone)]
pub struct PlanArgs {
    /// Sample range START:END[:STEP] (END exclusive). Repeatable; defaults to
    /// 2:1000:1 and 1000:10000:100.
    #[arg(long = "range", value_name = "START:END[:STEP]")]
    pub ranges: Vec<SampleRange>,
}

/// Bounds on the base of the log model.
#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Lower bound for the log base `a`.
    #[arg(long, default_value_t = 1.0)]
    pub log_a_min: f64,

    /// Upper bound for the log base `a`.
    #[arg(long, default_value_t = 10.0)]
    pub log_a_max: f64,
}

impl LogArgs {
    pub fn bounds(&self) -> LogBounds {
        LogBounds {
            a_min: self.log_a_min,
            a_max: self.log_a_max,
        }
    }
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Problem size.
    #[arg(
        short = 'n',
        long = "n",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(2..=MAX_N)
    )]
    pub n: u64,

    /// Print every row instead of head and tail.
    #[arg(long)]
    pub all_rows: bool,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Export the dataset to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for fitting.
#[derive(Debug, Args)]
pub struct FitArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[command(flatten)]
    pub log: LogArgs,

    /// Problem size at which the live fits are compared with the search.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(2..=MAX_N))]
    pub compare_n: u64,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Formula overlaid on the plot (defaults to the BIC winner).
    #[arg(long, value_enum)]
    pub overlay: Option<ModelKind>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the dataset to CSV.
    #[arg(long = "export-dataset")]
    pub export_dataset: Option<PathBuf>,

    /// Export fitted formulas to JSON.
    #[arg(long = "export-fits")]
    pub export_fits: Option<PathBuf>,
}

/// Options for plotting a saved fits file.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Fits JSON file produced by `gridfit fit --export-fits`.
    #[arg(long, value_name = "JSON")]
    pub fits: PathBuf,

    /// Formula overlaid on the plot (defaults to the file's best).
    #[arg(long, value_enum)]
    pub overlay: Option<ModelKind>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct TuiArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[command(flatten)]
    pub log: LogArgs,

    /// Problem size the cursor starts at.
    #[arg(
        short = 'n',
        long = "n",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..=MAX_N)
    )]
    pub n: u64,
}

#[derive(Debug, Args)]
pub struct GridSizeArgs {
    /// Particle counts to evaluate.
    #[arg(required = true, value_parser = clap::value_parser!(u64).range(1..=MAX_N))]
    pub counts: Vec<u64>,

    /// Use the log formula from a saved fits JSON instead of the recorded constants.
    #[arg(long, value_name = "JSON")]
    pub fits: Option<PathBuf>,
}
