//! Dataset generation: the minimizing grid size for every sampled `n`.

use crate::domain::{SamplePlan, SamplePoint};
use crate::search::table::find_best;

/// Upper bound on the rows reserved up front; longer plans grow as they go.
const MAX_PREALLOC_ROWS: usize = 1 << 16;

/// Sample the default plan (dense `2..1000`, sparse `1000..10000` step 100).
pub fn find_line() -> Vec<SamplePoint> {
    find_line_with(&SamplePlan::default())
}

/// Sample every range of `plan` in order and concatenate the results.
pub fn find_line_with(plan: &SamplePlan) -> Vec<SamplePoint> {
    let mut out = Vec::with_capacity(plan.total_len().min(MAX_PREALLOC_ROWS));
    for range in &plan.ranges {
        out.extend(range.values().map(|n| SamplePoint {
            n,
            best_g: find_best(n),
        }));
    }
    out
}
