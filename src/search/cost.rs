//! Cost model for a uniform grid over `n` items with `g × g` cells.
//!
//! ```text
//! base    = n*g^2 + g^2
//! best_1  = round(base + n^2/g^2)
//! best_16 = round(base + 16 * n^2/g^2)
//! ```
//!
//! `n*g^2 + g^2` is the cost of binning every item into the grid plus visiting
//! every cell; `n^2/g^2` is the pairwise work inside cells, weighted by 1 or 16.
//!
//! Integer terms are computed exactly in `u128`; the quotient `n^2/g^2` is
//! correctly rounded from the exact integers (a plain `f64` division rounds
//! twice once `n^2 > 2^53`), and rounding is half-to-even.

use crate::domain::CostRow;

/// Compute `(best_1, best_16)` for problem size `n` and grid size `g`.
///
/// `g` must be at least 1.
pub fn comps(n: u64, g: u64) -> (u64, u64) {
    let n = n as u128;
    let g2 = (g as u128) * (g as u128);

    let base = (n * g2 + g2) as f64;
    let pairs = exact_ratio(n * n, g2);

    let best_1 = (base + pairs).round_ties_even();
    let best_16 = (base + pairs * 16.0).round_ties_even();
    (best_1 as u64, best_16 as u64)
}

/// `num / den` rounded once to the nearest `f64` (ties to even).
///
/// Long division keeps 55-56 significant quotient bits; a non-zero remainder is
/// folded into the lowest bit as a sticky bit so the final integer-to-float
/// conversion rounds exactly like a correctly-rounded division.
pub fn exact_ratio(num: u128, den: u128) -> f64 {
    if num == 0 || den == 0 {
        return num as f64 / den as f64;
    }
    let den_bits = 128 - den.leading_zeros() as i32;
    let num_bits = 128 - num.leading_zeros() as i32;
    if den_bits + 55 > 127 {
        return num as f64 / den as f64;
    }

    let shift = 55 - (num_bits - den_bits);
    let (q, r) = if shift >= 0 {
        let scaled = num << shift;
        (scaled / den, scaled % den)
    } else {
        let scaled = den << -shift;
        (num / scaled, num % scaled)
    };
    let q = if r != 0 { q | 1 } else { q };
    q as f64 * pow2(-shift)
}

/// Exact `2^e` for normal exponents.
fn pow2(e: i32) -> f64 {
    f64::from_bits(((1023 + e) as u64) << 52)
}

impl CostRow {
    /// Evaluate the cost model for one `(n, g)` pair.
    pub fn evaluate(n: u64, g: u64) -> Self {
        let (best_1, best_16) = comps(n, g);
        Self {
            g,
            best_1,
            best_16,
            avg: (best_1 as f64 + best_16 as f64) / 2.0,
        }
    }
}
