//! Input/output helpers.
//!
//! - dataset CSV export (`export`)
//! - fits JSON read/write (`fits`)

pub mod export;
pub mod fits;

pub use export::*;
pub use fits::*;
