//! Plotters-powered rate history chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! X values are dates as days from the common era, so tick labels can be
//! turned back into dates by a plain `fn(f64) -> String`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct RatesPlottersChart<'a> {
    /// 10-year yield line.
    pub treasury: &'a [(f64, f64)],
    /// Estimated 30-year line.
    pub estimated_30y: &'a [(f64, f64)],
    /// Estimated 15-year line.
    pub estimated_15y: &'a [(f64, f64)],
    /// Published 30-year averages, drawn as dots.
    pub actual_30y: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    /// Percent.
    pub y_bounds: [f64; 2],
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for RatesPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
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
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let treasury_color = RGBColor(0, 255, 255); // cyan
            let est_30_color = RGBColor(255, 255, 0); // yellow
            let est_15_color = RGBColor(255, 0, 255); // magenta

            chart.draw_series(LineSeries::new(self.estimated_15y.iter().copied(), &est_15_color))?;
            chart.draw_series(LineSeries::new(self.estimated_30y.iter().copied(), &est_30_color))?;
            chart.draw_series(LineSeries::new(self.treasury.iter().copied(), &treasury_color))?;

            // Pixels rather than `Circle`: the backend scales circle radii
            // into canvas units and draws them far too large.
            chart.draw_series(
                self.actual_30y
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
