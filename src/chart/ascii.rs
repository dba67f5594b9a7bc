//! Character-grid chart rendering.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - plain-text output (`render`, `export`)
//! - terminals or areas where the Plotters widget has no room
//! - deterministic output (helpful for golden tests)
//!
//! Each series gets its own glyph; the legend line maps glyphs to names.

use super::figure::{Figure, Plot, SeriesStyle};

const GLYPHS: [char; 8] = ['#', 'o', '*', '+', 'x', '@', '%', '&'];

/// Render a figure as text: a header line, the grid, then axis/legend lines.
pub fn render_figure(figure: &Figure, width: usize, height: usize) -> String {
    let mut out = String::new();
    if let Some(title) = &figure.title {
        out.push_str(title);
        out.push('\n');
    }

    let Some(plot) = figure.plot() else {
        out.push_str("(no drawable traces)\n");
        push_skipped(&mut out, figure);
        return out;
    };

    for row in render_grid(&plot, width, height) {
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "x=[{:.3}, {:.3}]{} | y=[{:.3}, {:.3}]{}\n",
        plot.x_bounds[0],
        plot.x_bounds[1],
        figure.x_title.as_deref().map(|t| format!(" {t}")).unwrap_or_default(),
        plot.y_bounds[0],
        plot.y_bounds[1],
        figure.y_title.as_deref().map(|t| format!(" {t}")).unwrap_or_default(),
    ));
    if !plot.categories.is_empty() {
        let labels: Vec<String> = plot
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{i}={c}"))
            .collect();
        out.push_str(&format!("categories: {}\n", labels.join(", ")));
    }
    out.push_str(&legend(&plot));
    out.push('\n');
    push_skipped(&mut out, figure);
    out
}

/// Grid rows only (no header/legend), `height` rows of `width` chars each.
pub fn render_grid(plot: &Plot, width: usize, height: usize) -> Vec<String> {
    let width = width.max(10);
    let height = height.max(5);
    let [x_min, x_max] = plot.x_bounds;
    let [y_min, y_max] = plot.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    for (i, series) in plot.series.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        match series.style {
            SeriesStyle::Bars { width: bar_width } => {
                let half = bar_width / 2.0;
                let base = map_y(0.0_f64.clamp(y_min, y_max), y_min, y_max, height);
                for &(x, y) in &series.points {
                    let left = map_x(x - half, x_min, x_max, width);
                    let right = map_x(x + half, x_min, x_max, width);
                    let top = map_y(y, y_min, y_max, height);
                    let (r0, r1) = if top <= base { (top, base) } else { (base, top) };
                    for col in left..=right.max(left) {
                        for row in grid.iter_mut().take(r1 + 1).skip(r0) {
                            row[col] = glyph;
                        }
                    }
                }
            }
            SeriesStyle::Line => {
                let mut prev = None;
                for &(x, y) in &series.points {
                    let cx = map_x(x, x_min, x_max, width);
                    let cy = map_y(y, y_min, y_max, height);
                    if let Some((x0, y0)) = prev {
                        draw_line(&mut grid, x0, y0, cx, cy, glyph);
                    } else {
                        grid[cy][cx] = glyph;
                    }
                    prev = Some((cx, cy));
                }
            }
            SeriesStyle::Points => {
                for &(x, y) in &series.points {
                    if !(x.is_finite() && y.is_finite()) {
                        continue;
                    }
                    grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = glyph;
                }
            }
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn legend(plot: &Plot) -> String {
    let entries: Vec<String> = plot
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", GLYPHS[i % GLYPHS.len()], s.name))
        .collect();
    format!("legend: {}", entries.join(", "))
}

fn push_skipped(out: &mut String, figure: &Figure) {
    if !figure.skipped.is_empty() {
        out.push_str(&format!("not drawn: {}\n", figure.skipped.join(", ")));
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    if !u.is_finite() {
        return 0;
    }
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    if !u.is_finite() {
        return height - 1;
    }
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::figure::{Rgb, Series};

    #[test]
    fn grid_golden_snapshot_small() {
        let plot = Plot {
            x_bounds: [0.0, 9.0],
            y_bounds: [0.0, 4.0],
            categories: Vec::new(),
            series: vec![
                Series {
                    name: "diag".to_string(),
                    style: SeriesStyle::Line,
                    color: Rgb(0, 255, 255),
                    points: vec![(0.0, 0.0), (9.0, 4.0)],
                },
                Series {
                    name: "dot".to_string(),
                    style: SeriesStyle::Points,
                    color: Rgb(255, 0, 0),
                    points: vec![(0.0, 4.0)],
                },
            ],
        };

        let rows = render_grid(&plot, 10, 5);
        let expected = [
            "o       ##",
            "      ##  ",
            "    ##    ",
            "  ##      ",
            "##        ",
        ];
        assert_eq!(rows, expected);
    }

    #[test]
    fn figure_text_has_legend_and_categories() {
        let spec = serde_json::from_value(serde_json::json!({
            "data": [{"type": "bar", "name": "Win Rate", "x": ["bot", "top"], "y": [0.52, 0.48]}],
            "layout": {"title": "Win Rate by Gank Focus"}
        }))
        .unwrap();
        let txt = render_figure(&Figure::from_spec(spec), 20, 6);
        assert!(txt.starts_with("Win Rate by Gank Focus\n"));
        assert!(txt.contains("categories: 0=bot, 1=top\n"));
        assert!(txt.contains("legend: # Win Rate\n"));
        assert!(txt.contains('#'));
    }
}
