//! Cost table for a single problem size and its minimizer.
//!
//! Candidate grid sizes run over the half-open range
//! `[1, ceil(sqrt(n)) + GRID_MARGIN)`. The minimizer is the first row with the
//! lowest `avg`, so ties resolve to the smallest `g`.

use crate::domain::CostRow;

/// How far past `ceil(sqrt(n))` the candidate range extends (exclusive).
pub const GRID_MARGIN: u64 = 100;

/// Full cost table for one `n`.
#[derive(Debug, Clone)]
pub struct CostTable {
    n: u64,
    rows: Vec<CostRow>,
    best_index: usize,
}

impl CostTable {
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Rows in increasing `g` order, starting at `g = 1`.
    pub fn rows(&self) -> &[CostRow] {
        &self.rows
    }

    /// Row with the minimum `avg` (first occurrence).
    pub fn best(&self) -> &CostRow {
        &self.rows[self.best_index]
    }
}

/// `ceil(sqrt(n))`, computed exactly.
pub fn ceil_sqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt().ceil() as u64;
    while (r as u128) * (r as u128) < n as u128 {
        r += 1;
    }
    while r > 0 && ((r - 1) as u128) * ((r - 1) as u128) >= n as u128 {
        r -= 1;
    }
    r
}

/// Exclusive upper bound of the candidate grid sizes for `n`.
pub fn grid_upper_bound(n: u64) -> u64 {
    ceil_sqrt(n) + GRID_MARGIN
}

/// Build the cost table for `n`.
pub fn cost_table(n: u64) -> CostTable {
    let upper = grid_upper_bound(n);
    let mut rows = Vec::with_capacity(upper.saturating_sub(1) as usize);
    let mut best_index = 0;

    for g in 1..upper {
        let row = CostRow::evaluate(n, g);
        // Strict comparison keeps the first occurrence on ties.
        if rows.get(best_index).is_some_and(|best: &CostRow| row.avg < best.avg) {
            best_index = rows.len();
        }
        rows.push(row);
    }

    CostTable {
        n,
        rows,
        best_index,
    }
}

/// Grid size minimizing the averaged cost for `n`.
pub fn find_best(n: u64) -> u64 {
    cost_table(n).best().g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_sqrt_exact_around_squares() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(ceil_sqrt(5), 3);
        assert_eq!(ceil_sqrt(1000), 32);
        assert_eq!(ceil_sqrt(1024), 32);
        assert_eq!(ceil_sqrt(1025), 33);
    }

    #[test]
    fn table_for_1000() {
        let table = cost_table(1000);
        assert_eq!(table.n(), 1000);
        assert_eq!(table.rows().len(), 131);
        let first = table.rows()[0];
        assert_eq!((first.g, first.best_1, first.best_16), (1, 1_001_001, 16_001_001));
        assert_eq!(table.rows().last().map(|r| r.g), Some(131));

        let best = table.best();
        assert_eq!(best.g, 10);
        assert_eq!((best.best_1, best.best_16), (110_100, 260_100));
        assert_eq!(best.avg, 185_100.0);
    }

    #[test]
    fn find_best_known_values() {
        let cases = [
            (2, 2),
            (3, 2),
            (10, 3),
            (50, 5),
            (100, 5),
            (500, 8),
            (999, 10),
            (1000, 10),
            (5000, 14),
            (9900, 17),
        ];
        for (n, g) in cases {
            assert_eq!(find_best(n), g, "find_best({n})");
        }
    }

    #[test]
    fn find_best_stays_in_range() {
        for n in (2..2000).chain((2000..200_000).step_by(997)) {
            let g = find_best(n);
            assert!(g >= 1 && g <= ceil_sqrt(n) + GRID_MARGIN, "n={n} g={g}");
        }
    }

    #[test]
    fn best_is_first_minimum() {
        let table = cost_table(777);
        let best = table.best();
        for row in table.rows() {
            assert!(row.avg >= best.avg);
            if row.avg == best.avg {
                assert!(row.g >= best.g);
            }
        }
    }

    #[test]
    fn avg_has_single_minimum_region() {
        // Decreasing up to the minimizer, non-decreasing afterwards.
        for n in [2_u64, 17, 250, 1000, 4321, 9900] {
            let table = cost_table(n);
            let rows = table.rows();
            let best = table.best().g as usize - 1;
            for w in rows[..=best].windows(2) {
                assert!(w[1].avg <= w[0].avg, "n={n} rises before minimum at g={}", w[1].g);
            }
            for w in rows[best..].windows(2) {
                assert!(w[1].avg >= w[0].avg, "n={n} falls after minimum at g={}", w[1].g);
            }
        }
    }

    #[test]
    fn pair_term_non_increasing_in_g() {
        let n = 5000_u64;
        let table = cost_table(n);
        let mut prev = f64::INFINITY;
        for row in table.rows() {
            let pairs = (n * n) as f64 / (row.g * row.g) as f64;
            assert!(pairs <= prev);
            prev = pairs;
        }
    }
}
