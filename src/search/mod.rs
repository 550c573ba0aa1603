//! Brute-force search for the cost-minimizing grid size.
//!
//! - `cost`: the per-`(n, g)` cost model
//! - `table`: the cost table for one `n` and its minimizer
//! - `sample`: the `(n, best_g)` dataset over a sampling plan

pub mod cost;
pub mod sample;
pub mod table;

pub use cost::*;
pub use sample::*;
pub use table::*;
