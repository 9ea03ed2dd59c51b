//! Plotters-powered demand chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::series::display::DisplayConfig;

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the series, bounds, and label
/// callbacks all come from the prepared [`DisplayConfig`], so `render()` only
/// draws and never re-derives values computed by the alignment core.
pub struct DemandChart<'a> {
    pub display: &'a DisplayConfig,
}

impl Widget for DemandChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.display.x_bounds;
        let [y0, y1] = self.display.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // Terminal cells are low-res; cap the tick count well below the
        // configured maximum so labels stay readable.
        let x_ticks = self.display.max_x_ticks.min(6);

        let observed: Vec<(f64, f64)> = self.display.observed.present_points().collect();
        let forecast: Vec<(f64, f64)> = self.display.forecast.present_points().collect();
        let fmt_x = self.display.fmt_x;
        let fmt_y = self.display.fmt_y;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("time")
                .y_desc("demand (kWh)")
                .x_labels(x_ticks)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_x(*v))
                .y_label_formatter(&|v| fmt_y(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Gap spanning: missing samples were already filtered out of each
            // series, so a single polyline per series connects across gaps.
            let observed_color = RGBColor(0, 255, 255); // cyan
            let forecast_color = RGBColor(255, 85, 170); // pink

            chart.draw_series(LineSeries::new(observed.iter().copied(), &observed_color))?;
            chart.draw_series(LineSeries::new(forecast.iter().copied(), &forecast_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
