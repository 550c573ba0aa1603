//! Ratatui-based terminal UI.
//!
//! Shows the sampled dataset with a fitted formula overlaid, a cursor for
//! stepping through the points, and a side panel with every formula's
//! prediction at the cursor.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::ModelKind;
use crate::error::AppError;
use crate::models::{GridSizeRule, current_grid_size};

mod plotters_chart;

use plotters_chart::GridPlottersChart;

/// Points per overlay curve.
const CURVE_SAMPLES: usize = 200;

/// Cursor jump for PgUp/PgDn.
const PAGE_STEP: usize = 50;

/// Start the TUI on an already computed run.
pub fn run(run: RunOutput, compare_n: u64) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::numeric(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(run, compare_n);
    app.event_loop(&mut terminal)
}

/// Restores the terminal (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::numeric(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::numeric(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    run: RunOutput,
    overlay: ModelKind,
    cursor: usize,
    compare_n: u64,
    rule: GridSizeRule,
    status: String,
}

impl App {
    fn new(run: RunOutput, compare_n: u64) -> Self {
        let overlay = run.selection.best.formula.kind;
        let rule = run
            .selection
            .get(ModelKind::Log)
            .and_then(|f| GridSizeRule::from_formula(&f.formula))
            .unwrap_or_default();
        let status = format!("{} points | plan {}", run.points.len(), run.plan);
        let cursor = start_cursor(&run.points, compare_n);
        Self {
            run,
            overlay,
            cursor,
            compare_n,
            rule,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::numeric(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::numeric(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::numeric(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let last = self.run.points.len().saturating_sub(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(last),
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(PAGE_STEP),
            KeyCode::PageDown => self.cursor = (self.cursor + PAGE_STEP).min(last),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = last,
            KeyCode::Char('m') => {
                self.overlay = self.overlay.next();
                self.status = match self.run.selection.get(self.overlay) {
                    Some(_) => format!("overlay: {}", self.overlay.display_name()),
                    None => format!("overlay: {} (not fitted)", self.overlay.display_name()),
                };
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(chunks[1]);
        self.draw_chart(frame, body[0]);
        self.draw_details(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let best = &self.run.selection.best;
        let lines = vec![
            Line::from(vec![
                Span::styled("gridfit", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    " | best: {} | {}",
                    best.formula.display_name,
                    best.formula.expression()
                )),
            ]),
            Line::from(Span::styled(
                format!(
                    "rmse={:.4} | bic={:.3} | n={}",
                    best.quality.rmse, best.quality.bic, best.quality.n
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("best g vs n | overlay: {}", self.overlay.display_name()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = chart_series(&self.run, self.overlay);
        let cursor = series.data.get(self.cursor).copied();

        let (chart_rect, insets) = chart_layout(inner);
        let widget = GridPlottersChart {
            data: &series.data,
            curve: &series.curve,
            cursor,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "n",
            y_label: "best g",
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_details(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let gray = Style::default().fg(Color::Gray);
        let mut lines: Vec<Line> = Vec::new();

        if let Some(point) = self.run.points.get(self.cursor) {
            lines.push(Line::from(Span::styled(
                format!("n = {}", point.n),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("best g      {}", point.best_g)));
            lines.push(Line::from(format!("rule        {}", self.rule.grid_size(point.n))));
            lines.push(Line::from(format!("ceil(sqrt)  {}", current_grid_size(point.n))));
            lines.push(Line::from(""));
            for fit in &self.run.selection.fits {
                let marker = if fit.formula.kind == self.overlay { "»" } else { " " };
                lines.push(Line::from(format!(
                    "{marker} {:<6} {:>10.4}",
                    fit.formula.display_name,
                    fit.formula.predict(point.n as f64)
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("at n = {}", self.compare_n), gray)));
        lines.push(Line::from(Span::styled(
            format!(
                "rule {} | ceil(sqrt) {}",
                self.rule.grid_size(self.compare_n),
                current_grid_size(self.compare_n)
            ),
            gray,
        )));
        for (kind, reason) in &self.run.selection.skipped {
            lines.push(Line::from(Span::styled(
                format!("skipped {}: {reason}", kind.display_name()),
                Style::default().fg(Color::Yellow),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Point").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ move  PgUp/PgDn jump  Home/End  m overlay  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Index of the first point at or beyond `n`, else the last point.
fn start_cursor(points: &[crate::domain::SamplePoint], n: u64) -> usize {
    points
        .iter()
        .position(|p| p.n >= n)
        .unwrap_or(points.len().saturating_sub(1))
}

/// Precomputed chart data.
struct ChartSeries {
    data: Vec<(f64, f64)>,
    curve: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters; the curve is empty when `overlay` was not fitted.
fn chart_series(run: &RunOutput, overlay: ModelKind) -> ChartSeries {
    let data: Vec<(f64, f64)> = run
        .points
        .iter()
        .map(|p| (p.n as f64, p.best_g as f64))
        .collect();

    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, _) in &data {
        x0 = x0.min(x);
        x1 = x1.max(x);
    }
    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }

    let curve: Vec<(f64, f64)> = match run.selection.get(overlay) {
        Some(fit) => (0..CURVE_SAMPLES)
            .filter_map(|i| {
                let u = i as f64 / (CURVE_SAMPLES as f64 - 1.0);
                let x = x0 + u * (x1 - x0);
                let y = fit.formula.predict(x);
                y.is_finite().then_some((x, y))
            })
            .collect(),
        None => Vec::new(),
    };

    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in data.iter().chain(&curve) {
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if !y0.is_finite() || !y1.is_finite() || y1 <= y0 {
        y0 = 0.0;
        y1 = 1.0;
    }
    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);

    ChartSeries {
        data,
        curve,
        x_bounds: [x0, x1],
        y_bounds: [y0 - pad, y1 + pad],
    }
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_axis_x(x_bounds[0] + u * (x_bounds[1] - x_bounds[0]));
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: x.saturating_sub((label.len() / 2) as u16),
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_axis_y(y_bounds[0] + u * (y_bounds[1] - y_bounds[0]));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let start = (inner.x + insets.left.saturating_sub(1)).saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(Paragraph::new("n").alignment(Alignment::Center).style(style), x_rect);
    }

    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(
        Paragraph::new("best g").style(style.add_modifier(Modifier::BOLD)),
        y_rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitConfig, SamplePlan, SampleRange};

    fn small_run() -> RunOutput {
        let config = FitConfig {
            plan: SamplePlan {
                ranges: vec![SampleRange::new(2, 200, 1).unwrap()],
            },
            ..FitConfig::default()
        };
        crate::app::pipeline::run_fit(&config).unwrap()
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = App::new(small_run(), 1000);
        let last = app.run.points.len() - 1;
        assert_eq!(app.cursor, last);

        app.handle_key(KeyCode::Home);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.cursor, 0);
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.cursor, PAGE_STEP);
        app.handle_key(KeyCode::End);
        assert_eq!(app.cursor, last);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.cursor, last);
        app.handle_key(KeyCode::Home);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn cursor_starts_at_requested_n() {
        let run = small_run();
        assert_eq!(run.points[start_cursor(&run.points, 50)].n, 50);
        assert_eq!(start_cursor(&run.points, 1), 0);
        assert_eq!(start_cursor(&[], 50), 0);
    }

    #[test]
    fn overlay_cycles_through_all_models() {
        let mut app = App::new(small_run(), 1000);
        let start = app.overlay;
        for _ in 0..ModelKind::ALL.len() {
            assert!(!app.handle_key(KeyCode::Char('m')));
        }
        assert_eq!(app.overlay, start);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn series_cover_dataset_and_curve() {
        let run = small_run();
        let series = chart_series(&run, ModelKind::Log);
        assert_eq!(series.data.len(), run.points.len());
        assert_eq!(series.curve.len(), CURVE_SAMPLES);
        assert_eq!(series.x_bounds, [2.0, 199.0]);
        for &(_, y) in series.data.iter().chain(&series.curve) {
            assert!(y > series.y_bounds[0] && y < series.y_bounds[1]);
        }
    }

    #[test]
    fn chart_layout_reserves_axis_space() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 80, 30));
        assert!(insets.is_some());
        assert_eq!((rect.x, rect.width), (8, 70));
        let (small, none) = chart_layout(Rect::new(0, 0, 15, 6));
        assert!(none.is_none());
        assert_eq!(small.width, 15);
    }
}
