//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cost table rows and dataset points (`CostRow`, `SamplePoint`)
//! - sampling plans (`SampleRange`, `SamplePlan`)
//! - fit inputs/outputs (`ModelKind`, `LogBounds`, `FitResult`, `FitsFile`)

pub mod types;

pub use types::*;
