//! Plotters-powered chart renderer for Ratatui.
//!
//! Plotters output is drawn into the Ratatui buffer using
//! `plotters-ratatui-backend`. The figure is resolved to a [`Plot`] first, so
//! the closure below only draws.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{ChartRenderer, Figure, Plot, Rgb, SeriesStyle};

/// Below this the chart builder cannot fit its label areas.
const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render_chart(&self, figure: &Figure, area: Rect, buf: &mut Buffer) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let Some(plot) = figure.plot() else {
            buf.set_string(
                area.x,
                area.y,
                "(no drawable traces)",
                Style::default().fg(Color::Yellow),
            );
            return;
        };

        let [x0, x1] = plot.x_bounds;
        let [y0, y1] = plot.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let x_desc = figure.x_title.clone().unwrap_or_default();
        let y_desc = figure.y_title.clone().unwrap_or_default();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let x_labels = if plot.categories.is_empty() {
                5
            } else {
                plot.categories.len()
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_desc.as_str())
                .y_desc(y_desc.as_str())
                .x_labels(x_labels)
                .y_labels(5)
                .x_label_formatter(&|v| x_tick(&plot, *v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in &plot.series {
                let color = to_plotters(series.color);
                match series.style {
                    SeriesStyle::Line => {
                        chart.draw_series(LineSeries::new(series.points.iter().copied(), &color))?;
                    }
                    // Pixels rather than circles: the backend maps circle radii
                    // to canvas units and draws them far too large.
                    SeriesStyle::Points => {
                        chart.draw_series(
                            series.points.iter().map(|&(x, y)| Pixel::new((x, y), color)),
                        )?;
                    }
                    SeriesStyle::Bars { width } => {
                        let half = width / 2.0;
                        chart.draw_series(series.points.iter().map(|&(x, y)| {
                            Rectangle::new([(x - half, 0.0), (x + half, y)], color.filled())
                        }))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn to_plotters(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// Category charts label integer positions with the category name.
fn x_tick(plot: &Plot, v: f64) -> String {
    if plot.categories.is_empty() {
        return format!("{v:.2}");
    }
    let nearest = v.round();
    if (v - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    plot.categories
        .get(nearest as usize)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Series, SeriesStyle};

    fn plot(categories: &[&str]) -> Plot {
        Plot {
            x_bounds: [-0.5, 1.5],
            y_bounds: [0.0, 1.0],
            categories: categories.iter().map(|c| c.to_string()).collect(),
            series: vec![Series {
                name: "win rate".to_string(),
                style: SeriesStyle::Bars { width: 0.8 },
                color: Rgb(0, 255, 255),
                points: vec![(0.0, 0.52), (1.0, 0.48)],
            }],
        }
    }

    #[test]
    fn category_ticks_only_on_integer_positions() {
        let p = plot(&["bot", "top"]);
        assert_eq!(x_tick(&p, 0.0), "bot");
        assert_eq!(x_tick(&p, 1.0), "top");
        assert_eq!(x_tick(&p, 0.5), "");
        assert_eq!(x_tick(&p, 2.0), "");
        assert_eq!(x_tick(&plot(&[]), 0.5), "0.50");
    }

    #[test]
    fn small_area_shows_hint() {
        let spec = serde_json::from_value(serde_json::json!({
            "data": [{"type": "bar", "x": ["bot", "top"], "y": [0.52, 0.48]}]
        }))
        .unwrap();
        let figure = Figure::from_spec(spec);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        PlottersRenderer.render_chart(&figure, area, &mut buf);
        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert_eq!(first_row, "Chart area");
    }
}
