//! Plotters-powered grid-size chart widget for Ratatui.
//!
//! Plotters gives nicer axis and mesh rendering than Ratatui's built-in
//! `Chart`. Output lands in the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series and bounds are computed by the caller.
pub struct GridPlottersChart<'a> {
    /// Dataset `(n, best_g)` drawn as a step-like line.
    pub data: &'a [(f64, f64)],
    /// Sampled overlay formula; may be empty.
    pub curve: &'a [(f64, f64)],
    /// Currently selected dataset point.
    pub cursor: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for GridPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart this small.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let finite = x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite();
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let data_color = WHITE;
            let curve_color = RGBColor(0, 255, 255); // cyan
            let cursor_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.data.iter().copied(), &data_color))?;
            if !self.curve.is_empty() {
                chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;
            }

            // Circle markers render with the wrong radius on this backend; a
            // vertical rule plus a pixel marks the cursor instead.
            if let Some((cx, cy)) = self.cursor {
                chart.draw_series(LineSeries::new([(cx, y0), (cx, y1)], &cursor_color))?;
                chart.draw_series(std::iter::once(Pixel::new((cx, cy), RGBColor(0, 255, 0))))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
