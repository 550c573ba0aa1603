//! Grid-size formula implementations.
//!
//! - `model`: evaluation of fitted formulas
//! - `reference`: transcribed constants and the integer grid-size rule

pub mod model;
pub mod reference;

pub use model::*;
pub use reference::*;
