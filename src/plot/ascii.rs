//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - dataset `best_g` vs `n`: `*` line
//! - optional fitted formula: `-` line (drawn only on empty cells)

use crate::domain::{Formula, SamplePoint};

/// Render the dataset as a line plot, optionally with a fitted formula overlaid.
pub fn render_ascii_plot(
    points: &[SamplePoint],
    overlay: Option<&Formula>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.n as f64, p.best_g as f64))
        .collect();
    let (x_min, x_max) = x_range(&data).unwrap_or((1.0, 2.0));
    let curve = overlay
        .map(|f| sample_formula(f, x_min, x_max, width))
        .unwrap_or_default();

    let (y_min, y_max) = y_range(&data, &curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    draw_series(&mut grid, &data, '*', x_min, x_max, y_min, y_max);
    draw_series(&mut grid, &curve, '-', x_min, x_max, y_min, y_max);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: n=[{x_min:.0}, {x_max:.0}] | best_g=[{y_min:.2}, {y_max:.2}]"
    ));
    if let Some(f) = overlay {
        out.push_str(&format!(" | overlay: {}", f.display_name));
    }
    out.push('\n');

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn sample_formula(formula: &Formula, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .filter_map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            let y = formula.predict(x);
            y.is_finite().then_some((x, y))
        })
        .collect()
}

fn x_range(data: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in data {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(data: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in data.iter().chain(curve) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(
    grid: &mut [Vec<char>],
    series: &[(f64, f64)],
    ch: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let Some(width) = grid.first().map(Vec::len) else {
        return;
    };

    let mut prev = None;
    for &(x, y) in series {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, gx, gy, ch),
            None => {
                if grid[gy][gx] == ' ' {
                    grid[gy][gx] = ch;
                }
            }
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
