//! Reference formulas transcribed from an earlier fit, and the integer
//! grid-size rule the particle simulation derives from them.
//!
//! These constants are kept as recorded. The live polynomial fits on the
//! default dataset do not reproduce the polynomial constants below; the log
//! constants do.

use crate::domain::{Formula, ModelKind};
use crate::math::log_base;
use crate::search::ceil_sqrt;

/// `1.50478571e-03 * n + 5.20041608`, lowest degree first.
pub const REFERENCE_POLY1: [f64; 2] = [5.200_416_08, 1.504_785_71e-03];

/// `-2.03480284e-07 * n^2 + 3.13657600e-03 * n + 4.45486443`, lowest degree first.
pub const REFERENCE_POLY2: [f64; 3] = [4.454_864_43, 3.136_576_00e-03, -2.034_802_84e-07];

/// `4.09570571e-11 * n^3 - 7.56862212e-07 * n^2 + 4.87629916e-03 * n + 4.17145722`,
/// lowest degree first.
pub const REFERENCE_POLY3: [f64; 4] = [
    4.171_457_22,
    4.876_299_16e-03,
    -7.568_622_12e-07,
    4.095_705_71e-11,
];

/// Log base `a` of `log_a(n) + b`.
pub const REFERENCE_LOG_A: f64 = 1.657_272_5;

/// Offset `b` of `log_a(n) + b`.
pub const REFERENCE_LOG_B: f64 = -3.892_932_67;

/// Smallest grid the simulation will build.
pub const MIN_GRID_SIZE: u64 = 2;

/// The transcribed formula for `kind`.
pub fn reference_formula(kind: ModelKind) -> Formula {
    let params = match kind {
        ModelKind::Poly1 => REFERENCE_POLY1.to_vec(),
        ModelKind::Poly2 => REFERENCE_POLY2.to_vec(),
        ModelKind::Poly3 => REFERENCE_POLY3.to_vec(),
        ModelKind::Log => vec![REFERENCE_LOG_A, REFERENCE_LOG_B],
    };
    Formula::new(kind, params)
}

/// Previous rule: one cell per item along each axis, `ceil(sqrt(n))`.
pub fn current_grid_size(n: u64) -> u64 {
    ceil_sqrt(n)
}

/// Integer grid size from a log formula: `max(ceil(log_a(n) + b), 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSizeRule {
    pub a: f64,
    pub b: f64,
}

impl Default for GridSizeRule {
    fn default() -> Self {
        Self {
            a: REFERENCE_LOG_A,
            b: REFERENCE_LOG_B,
        }
    }
}

impl GridSizeRule {
    /// Build a rule from a fitted log formula; `None` for other kinds.
    pub fn from_formula(formula: &Formula) -> Option<Self> {
        match (formula.kind, formula.params.as_slice()) {
            (ModelKind::Log, [a, b, ..]) => Some(Self { a: *a, b: *b }),
            _ => None,
        }
    }

    pub fn grid_size(&self, n: u64) -> u64 {
        if n == 0 {
            return MIN_GRID_SIZE;
        }
        let raw = (log_base(n as f64, self.a) + self.b).ceil();
        if raw.is_finite() && raw > MIN_GRID_SIZE as f64 {
            raw as u64
        } else {
            MIN_GRID_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values_at_1000() {
        let n = 1000.0;
        let deg1 = reference_formula(ModelKind::Poly1).predict(n);
        assert!((deg1 - (1.50478571e-03 * n + 5.20041608)).abs() < 1e-12);
        let deg3 = reference_formula(ModelKind::Poly3).predict(n);
        let expected = 4.09570571e-11 * n * n * n - 7.56862212e-07 * n * n
            + 4.87629916e-03 * n
            + 4.17145722;
        assert!((deg3 - expected).abs() < 1e-9);
        let log = reference_formula(ModelKind::Log).predict(n);
        assert!((log - 9.781_101).abs() < 1e-5, "log formula at 1000 = {log}");
    }

    #[test]
    fn current_rule_is_ceil_sqrt() {
        assert_eq!(current_grid_size(1000), 32);
        assert_eq!(current_grid_size(100), 10);
    }

    #[test]
    fn grid_size_rule_clamps_small_counts() {
        let rule = GridSizeRule::default();
        assert_eq!(rule.grid_size(0), 2);
        assert_eq!(rule.grid_size(1), 2);
        assert_eq!(rule.grid_size(10), 2);
        assert_eq!(rule.grid_size(1000), 10);
        assert_eq!(rule.grid_size(10_000), 15);
    }

    #[test]
    fn rule_only_from_log_formula() {
        let log = reference_formula(ModelKind::Log);
        assert_eq!(GridSizeRule::from_formula(&log), Some(GridSizeRule::default()));
        assert!(GridSizeRule::from_formula(&reference_formula(ModelKind::Poly2)).is_none());
    }
}
