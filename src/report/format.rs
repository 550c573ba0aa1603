//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the search/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitResult, ModelKind, SamplePlan, SamplePoint};
use crate::fit::FitSelection;
use crate::models::{GridSizeRule, current_grid_size, reference_formula};
use crate::search::{CostTable, find_best};

/// Tables longer than this are shown as head + tail.
pub const DEFAULT_MAX_ROWS: usize = 60;

const EDGE_ROWS: usize = 5;

/// Format a cost table, truncating to head/tail when it exceeds `max_rows`
/// (`None` prints every row).
pub fn format_cost_table(table: &CostTable, max_rows: Option<usize>) -> String {
    let rows = table.rows();
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:>12} {:>12} {:>14}\n",
        "g", "best (1)", "best (16)", "avg"
    ));

    let truncate = max_rows.is_some_and(|max| rows.len() > max);
    for (i, row) in rows.iter().enumerate() {
        if truncate && i >= EDGE_ROWS && i < rows.len() - EDGE_ROWS {
            if i == EDGE_ROWS {
                out.push_str(&format!("{:>6}\n", "..."));
            }
            continue;
        }
        out.push_str(&format!(
            "{:>6} {:>12} {:>12} {:>14.1}\n",
            row.g, row.best_1, row.best_16, row.avg
        ));
    }

    if truncate {
        out.push_str(&format!("\n[{} rows x 3 columns]\n", rows.len()));
    }
    out
}

/// Compare the previous rule and the recorded formulas against the live
/// minimizer for `table.n()`.
///
/// The "Calculated" lines use the recorded constants, not a live fit.
pub fn format_comparison(table: &CostTable) -> String {
    let n = table.n();
    let x = n as f64;
    let mut out = String::new();
    out.push_str(&format!("Current: {}\n", current_grid_size(n)));
    for kind in [ModelKind::Poly1, ModelKind::Poly2, ModelKind::Poly3, ModelKind::Log] {
        out.push_str(&format!(
            "Calculated ({}): {}\n",
            kind.display_name(),
            reference_formula(kind).predict(x)
        ));
    }
    out.push_str(&format!("Best: {}\n", table.best().g));
    out
}

/// Summarize a generated dataset.
pub fn format_sample_summary(points: &[SamplePoint], plan: &SamplePlan) -> String {
    let mut out = String::new();
    out.push_str(&format!("Dataset: {} points | plan: {plan}\n", points.len()));

    let n_min = points.iter().map(|p| p.n).min();
    let n_max = points.iter().map(|p| p.n).max();
    let g_min = points.iter().map(|p| p.best_g).min();
    let g_max = points.iter().map(|p| p.best_g).max();
    if let (Some(n0), Some(n1), Some(g0), Some(g1)) = (n_min, n_max, g_min, g_max) {
        out.push_str(&format!("n=[{n0}, {n1}] | best_g=[{g0}, {g1}]\n"));
    }

    // Where best_g steps up.
    out.push_str("\nTransitions (first n for each best_g):\n");
    let mut prev = None;
    for p in points {
        if prev != Some(p.best_g) {
            out.push_str(&format!("{:>8} -> {}\n", p.n, p.best_g));
            prev = Some(p.best_g);
        }
    }
    out
}

/// Format the full fit summary (diagnostics + coefficients + formulas).
pub fn format_fit_summary(
    selection: &FitSelection,
    points: &[SamplePoint],
    plan: &SamplePlan,
) -> String {
    let mut out = String::new();

    out.push_str("=== gridfit - grid size regression ===\n");
    out.push_str(&format!("Dataset: {} points | plan: {plan}\n", points.len()));

    out.push_str("\nModel diagnostics:\n");
    for fit in &selection.fits {
        let chosen = if fit.formula.kind == selection.best.formula.kind { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<6} SSE={:.3} RMSE={:.4} BIC={:.3}\n",
            fit.formula.display_name, fit.quality.sse, fit.quality.rmse, fit.quality.bic
        ));
    }
    for (kind, reason) in &selection.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
    }

    out.push_str("\nCoefficients (highest degree first):\n");
    for fit in &selection.fits {
        out.push_str(&format!("- {:<6} {}\n", fit.formula.display_name, fmt_params(fit)));
    }

    out.push_str("\nFormulas:\n");
    for fit in &selection.fits {
        out.push_str(&format!(
            "- {:<6} {}\n",
            fit.formula.display_name,
            fit.formula.expression()
        ));
    }

    if let Some(rule) = selection
        .get(ModelKind::Log)
        .and_then(|f| GridSizeRule::from_formula(&f.formula))
    {
        out.push_str(&format!(
            "\nGrid-size rule: max(ceil(log(n, {:.7}) {} {:.8}), 2)\n",
            rule.a,
            if rule.b < 0.0 { '-' } else { '+' },
            rule.b.abs()
        ));
    }
    out
}

/// Evaluate every fitted formula at `n` next to the live minimizer.
pub fn format_live_comparison(selection: &FitSelection, n: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Live fits at n={n}:\n"));
    for fit in &selection.fits {
        out.push_str(&format!(
            "Fitted ({}): {}\n",
            fit.formula.display_name,
            fit.formula.predict(n as f64)
        ));
    }
    out.push_str(&format!("Best: {}\n", find_best(n)));
    out
}

/// Compare grid sizes for a list of particle counts.
pub fn format_grid_sizes(counts: &[u64], rule: &GridSizeRule) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>14} {:>10} {:>8}\n",
        "n", "ceil(sqrt(n))", "log rule", "best"
    ));
    for &n in counts {
        out.push_str(&format!(
            "{:>12} {:>14} {:>10} {:>8}\n",
            n,
            current_grid_size(n),
            rule.grid_size(n),
            find_best(n)
        ));
    }
    out
}

fn fmt_params(fit: &FitResult) -> String {
    let values: Vec<String> = match fit.formula.kind {
        ModelKind::Log => fit.formula.params.iter().map(|v| format!("{v:.8}")).collect(),
        _ => fit.formula.params.iter().rev().map(|v| format!("{v:.8e}")).collect(),
    };
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, Formula};
    use crate::search::cost_table;

    #[test]
    fn cost_table_truncates_long_tables() {
        let txt = format_cost_table(&cost_table(1000), Some(DEFAULT_MAX_ROWS));
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "     1      1001001     16001001      8501001.0");
        assert!(txt.contains("   ..."));
        assert!(txt.ends_with("[131 rows x 3 columns]\n"));
        // header + 5 + ellipsis + 5 + blank + footer
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn cost_table_full_listing() {
        let txt = format_cost_table(&cost_table(1000), None);
        assert_eq!(txt.lines().count(), 132);
        assert!(!txt.contains("rows x"));
    }

    #[test]
    fn comparison_block_for_1000() {
        let txt = format_comparison(&cost_table(1000));
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Current: 32");
        assert!(lines[1].starts_with("Calculated (deg 1): 6.705"));
        assert!(lines[4].starts_with("Calculated (log): 9.78"));
        assert_eq!(lines[5], "Best: 10");
    }

    #[test]
    fn sample_summary_lists_transitions() {
        let points = vec![
            SamplePoint { n: 2, best_g: 2 },
            SamplePoint { n: 3, best_g: 2 },
            SamplePoint { n: 6, best_g: 3 },
        ];
        let txt = format_sample_summary(&points, &SamplePlan::default());
        assert!(txt.contains("n=[2, 6] | best_g=[2, 3]"));
        assert!(txt.contains("       2 -> 2\n"));
        assert!(txt.contains("       6 -> 3\n"));
        assert!(!txt.contains("       3 -> 2\n"));
    }

    #[test]
    fn params_listed_highest_degree_first() {
        let fit = FitResult {
            formula: Formula::new(ModelKind::Poly1, vec![5.0, 0.5]),
            quality: FitQuality { sse: 0.0, rmse: 0.0, bic: 0.0, n: 2 },
        };
        assert_eq!(fmt_params(&fit), "[5.00000000e-1, 5.00000000e0]");
    }

    #[test]
    fn grid_sizes_table_rows() {
        let txt = format_grid_sizes(&[1000], &GridSizeRule::default());
        let row = txt.lines().nth(1).unwrap();
        let cols: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(cols, vec!["1000", "32", "10", "10"]);
    }
}
