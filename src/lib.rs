//! `grid-size-fit` library crate.
//!
//! Estimates an empirical formula for the uniform-grid size `g` to use for `n`
//! items: brute-force the cost model per `n`, then fit polynomial and log
//! curves to the minimizers.
//!
//! The binary (`gridfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the search and the fits are reusable from other tools

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod search;
pub mod telemetry;
pub mod tui;
