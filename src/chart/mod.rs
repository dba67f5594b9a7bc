//! Chart specifications and the renderers that draw them.
//!
//! Pages never draw charts themselves: they hold a [`Figure`] and hand it to
//! whichever [`ChartRenderer`] the front-end picked at start-up.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

pub mod ascii;
pub mod figure;

pub use figure::{ChartSpec, Figure, Plot, Rgb, Series, SeriesStyle};

/// The one interface between report pages and a plotting capability.
pub trait ChartRenderer {
    fn render_chart(&self, figure: &Figure, area: Rect, buf: &mut Buffer);
}

/// Draws the character grid from [`ascii`] into a terminal buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextGridRenderer;

impl ChartRenderer for TextGridRenderer {
    fn render_chart(&self, figure: &Figure, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(plot) = figure.plot() else {
            buf.set_string(area.x, area.y, "(no drawable traces)", Style::default().fg(Color::Yellow));
            return;
        };
        let rows = ascii::render_grid(&plot, area.width as usize, area.height as usize);
        for (i, row) in rows.iter().enumerate().take(area.height as usize) {
            let line: String = row.chars().take(area.width as usize).collect();
            buf.set_string(area.x, area.y + i as u16, line, Style::default().fg(Color::Cyan));
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}
