//! Plotly figure decoding.
//!
//! A chart artifact is a Plotly `{data, layout}` object. We keep the raw spec
//! untouched apart from `layout.autosize = true`, and derive a drawable
//! [`Plot`] from it: category axes resolved, histograms binned, grouped bars
//! offset, vertical reference lines (`fig.add_vline`) turned into segments.
//!
//! Plotly can serialize arrays either as plain JSON arrays or as typed arrays
//! (`{"dtype": "f8", "bdata": "<base64>"}`). [`decode_array`] is the only place
//! that tells the two apart.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default histogram bin count when a trace does not set `nbinsx`.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Total width taken by a group of bars at one category.
const BAR_GROUP_WIDTH: f64 = 0.8;

/// The fetched `{data, layout}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub data: Vec<Value>,
    #[serde(default)]
    pub layout: Map<String, Value>,
}

impl ChartSpec {
    /// Force the chart to fill its container. Nothing else is changed.
    pub fn responsive(mut self) -> Self {
        self.layout.insert("autosize".to_string(), Value::Bool(true));
        self
    }
}

/// An x value: numeric axes and categorical axes (`["bot", "top"]`) both occur.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValue {
    Number(f64),
    Category(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceKind {
    Bar,
    Scatter { lines: bool, markers: bool },
    Histogram { bins: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub kind: TraceKind,
    pub name: Option<String>,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    pub color: Option<Rgb>,
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A vertical reference line at `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct VLine {
    pub x: f64,
    pub color: Option<Rgb>,
}

/// Decoded figure, ready for any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub spec: ChartSpec,
    pub title: Option<String>,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub traces: Vec<Trace>,
    pub vlines: Vec<VLine>,
    /// Trace types the renderers do not draw (e.g. `box`), for the legend line.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    Line,
    Points,
    /// Bars centred on each point's x with the given width in axis units.
    Bars { width: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub style: SeriesStyle,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

/// Everything a renderer needs, in plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Category labels; category `i` sits at `x = i`.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

/// High-contrast palette for traces without an explicit colour.
const PALETTE: [Rgb; 6] = [
    Rgb(0, 255, 255),
    Rgb(255, 165, 0),
    Rgb(0, 255, 0),
    Rgb(255, 0, 255),
    Rgb(255, 255, 0),
    Rgb(135, 206, 250),
];

impl Figure {
    pub fn from_spec(spec: ChartSpec) -> Self {
        let spec = spec.responsive();
        let layout = &spec.layout;

        let title = layout.get("title").and_then(title_text);
        let x_title = axis_title(layout, "xaxis");
        let y_title = axis_title(layout, "yaxis");

        let mut traces = Vec::new();
        let mut skipped = Vec::new();
        for raw in &spec.data {
            match decode_trace(raw) {
                Ok(trace) => traces.push(trace),
                Err(kind) => skipped.push(kind),
            }
        }

        let vlines = layout
            .get("shapes")
            .and_then(Value::as_array)
            .map(|shapes| shapes.iter().filter_map(decode_vline).collect())
            .unwrap_or_default();

        Self {
            spec,
            title,
            x_title,
            y_title,
            traces,
            vlines,
            skipped,
        }
    }

    /// Resolve traces into drawable series. `None` when nothing is drawable.
    pub fn plot(&self) -> Option<Plot> {
        let categories = self.categories();
        let bar_traces = self
            .traces
            .iter()
            .filter(|t| matches!(t.kind, TraceKind::Bar))
            .count();
        let bar_width = BAR_GROUP_WIDTH / bar_traces.max(1) as f64;

        let mut series = Vec::new();
        let mut bar_index = 0usize;
        for (i, trace) in self.traces.iter().enumerate() {
            let color = trace.color.unwrap_or(PALETTE[i % PALETTE.len()]);
            let name = trace.name.clone().unwrap_or_else(|| format!("trace {}", i + 1));
            match trace.kind {
                TraceKind::Bar => {
                    let offset = (bar_index as f64 - (bar_traces as f64 - 1.0) / 2.0) * bar_width;
                    bar_index += 1;
                    let points = trace
                        .x
                        .iter()
                        .zip(&trace.y)
                        .filter_map(|(x, &y)| position(x, &categories).map(|x| (x + offset, y)))
                        .collect();
                    series.push(Series {
                        name,
                        style: SeriesStyle::Bars { width: bar_width },
                        color,
                        points,
                    });
                }
                TraceKind::Histogram { bins } => {
                    let values: Vec<f64> = trace
                        .x
                        .iter()
                        .filter_map(|x| match x {
                            AxisValue::Number(v) => Some(*v),
                            AxisValue::Category(_) => None,
                        })
                        .collect();
                    if let Some((points, width)) = histogram(&values, bins) {
                        series.push(Series {
                            name,
                            style: SeriesStyle::Bars { width },
                            color,
                            points,
                        });
                    }
                }
                TraceKind::Scatter { lines, markers } => {
                    let points: Vec<(f64, f64)> = trace
                        .x
                        .iter()
                        .zip(&trace.y)
                        .filter_map(|(x, &y)| position(x, &categories).map(|x| (x, y)))
                        .collect();
                    if lines {
                        series.push(Series {
                            name: name.clone(),
                            style: SeriesStyle::Line,
                            color,
                            points: points.clone(),
                        });
                    }
                    if markers || !lines {
                        series.push(Series {
                            name,
                            style: SeriesStyle::Points,
                            color,
                            points,
                        });
                    }
                }
            }
        }

        series.retain(|s| !s.points.is_empty());
        if series.is_empty() {
            return None;
        }

        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
        for s in &series {
            let half = match s.style {
                SeriesStyle::Bars { width } => width / 2.0,
                _ => 0.0,
            };
            for &(x, y) in &s.points {
                x0 = x0.min(x - half);
                x1 = x1.max(x + half);
                y0 = y0.min(y);
                y1 = y1.max(y);
            }
            if matches!(s.style, SeriesStyle::Bars { .. }) {
                y0 = y0.min(0.0);
            }
        }
        for line in &self.vlines {
            x0 = x0.min(line.x);
            x1 = x1.max(line.x);
        }

        let [x0, x1] = padded(x0, x1);
        let [y0, y1] = padded(y0, y1);

        let mut plot = Plot {
            x_bounds: [x0, x1],
            y_bounds: [y0, y1],
            categories,
            series,
        };
        for (i, line) in self.vlines.iter().enumerate() {
            plot.series.push(Series {
                name: format!("line {}", i + 1),
                style: SeriesStyle::Line,
                color: line.color.unwrap_or(Rgb(255, 0, 0)),
                points: vec![(line.x, y0), (line.x, y1)],
            });
        }
        Some(plot)
    }

    /// Category labels in order of first appearance across all traces.
    fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for trace in &self.traces {
            for x in &trace.x {
                if let AxisValue::Category(c) = x {
                    if !out.contains(c) {
                        out.push(c.clone());
                    }
                }
            }
        }
        out
    }
}

fn position(x: &AxisValue, categories: &[String]) -> Option<f64> {
    match x {
        AxisValue::Number(v) => Some(*v),
        AxisValue::Category(c) => categories.iter().position(|k| k == c).map(|i| i as f64),
    }
}

fn padded(lo: f64, hi: f64) -> [f64; 2] {
    if !(lo.is_finite() && hi.is_finite()) {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = ((hi - lo) * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}

/// Equal-width histogram. Returns bar centres with counts, and the bin width.
fn histogram(values: &[f64], bins: usize) -> Option<(Vec<(f64, f64)>, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if finite.is_empty() {
        return None;
    }
    let bins = bins.max(1);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let points = counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + (i as f64 + 0.5) * width, c as f64))
        .collect();
    Some((points, width))
}

/// Decode one trace. `Err` carries the trace type for the "skipped" note.
fn decode_trace(raw: &Value) -> Result<Trace, String> {
    let kind_name = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("scatter")
        .to_string();

    let kind = match kind_name.as_str() {
        "bar" => TraceKind::Bar,
        "histogram" => TraceKind::Histogram {
            bins: raw
                .get("nbinsx")
                .and_then(Value::as_u64)
                .filter(|&n| n > 0)
                .map(|n| n as usize)
                .unwrap_or(DEFAULT_HISTOGRAM_BINS),
        },
        "scatter" | "scattergl" => {
            let mode = raw.get("mode").and_then(Value::as_str).unwrap_or("markers");
            TraceKind::Scatter {
                lines: mode.contains("lines"),
                markers: mode.contains("markers"),
            }
        }
        _ => return Err(kind_name),
    };

    let x = raw
        .get("x")
        .map(decode_axis)
        .transpose()
        .map_err(|_| kind_name.clone())?
        .unwrap_or_default();
    let y = match raw.get("y") {
        Some(v) => decode_array(v).map_err(|_| kind_name.clone())?,
        None => Vec::new(),
    };

    // Traces with only `y` plot against the point index, as Plotly does.
    let x = if x.is_empty() && !matches!(kind, TraceKind::Histogram { .. }) {
        (0..y.len()).map(|i| AxisValue::Number(i as f64)).collect()
    } else {
        x
    };

    let color = raw
        .get("marker")
        .and_then(|m| m.get("color"))
        .or_else(|| raw.get("line").and_then(|l| l.get("color")))
        .and_then(|c| match c {
            Value::String(s) => parse_color(s),
            Value::Array(items) => items.first().and_then(Value::as_str).and_then(parse_color),
            _ => None,
        });

    Ok(Trace {
        kind,
        name: raw.get("name").and_then(Value::as_str).map(str::to_string),
        x,
        y,
        color,
    })
}

fn decode_axis(raw: &Value) -> Result<Vec<AxisValue>, ArrayError> {
    if let Value::Array(items) = raw {
        if items.iter().any(Value::is_string) {
            return Ok(items
                .iter()
                .map(|v| match v {
                    Value::String(s) => AxisValue::Category(s.clone()),
                    other => AxisValue::Category(other.to_string()),
                })
                .collect());
        }
    }
    Ok(decode_array(raw)?.into_iter().map(AxisValue::Number).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayError(pub String);

/// Decode a numeric array given either as a JSON array or as a Plotly typed
/// array (`{"dtype", "bdata"}`, little-endian). `null` entries become NaN.
pub fn decode_array(raw: &Value) -> Result<Vec<f64>, ArrayError> {
    match raw {
        Value::Array(items) => Ok(items
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect()),
        Value::Object(obj) => {
            let dtype = obj
                .get("dtype")
                .and_then(Value::as_str)
                .ok_or_else(|| ArrayError("typed array without dtype".to_string()))?;
            let bdata = obj
                .get("bdata")
                .and_then(Value::as_str)
                .ok_or_else(|| ArrayError("typed array without bdata".to_string()))?;
            let bytes = STANDARD
                .decode(bdata)
                .map_err(|e| ArrayError(format!("invalid bdata: {e}")))?;
            decode_typed(dtype, &bytes)
        }
        _ => Err(ArrayError("expected an array".to_string())),
    }
}

fn decode_typed(dtype: &str, bytes: &[u8]) -> Result<Vec<f64>, ArrayError> {
    fn chunks<const N: usize>(bytes: &[u8], f: impl Fn([u8; N]) -> f64) -> Result<Vec<f64>, ArrayError> {
        if bytes.len() % N != 0 {
            return Err(ArrayError(format!("{} bytes is not a multiple of {N}", bytes.len())));
        }
        Ok(bytes
            .chunks_exact(N)
            .map(|c| {
                let mut buf = [0u8; N];
                buf.copy_from_slice(c);
                f(buf)
            })
            .collect())
    }

    match dtype {
        "f8" => chunks::<8>(bytes, f64::from_le_bytes),
        "f4" => chunks::<4>(bytes, |b| f32::from_le_bytes(b) as f64),
        "i1" => chunks::<1>(bytes, |b| i8::from_le_bytes(b) as f64),
        "u1" => chunks::<1>(bytes, |b| b[0] as f64),
        "i2" => chunks::<2>(bytes, |b| i16::from_le_bytes(b) as f64),
        "u2" => chunks::<2>(bytes, |b| u16::from_le_bytes(b) as f64),
        "i4" => chunks::<4>(bytes, |b| i32::from_le_bytes(b) as f64),
        "u4" => chunks::<4>(bytes, |b| u32::from_le_bytes(b) as f64),
        other => Err(ArrayError(format!("unsupported dtype '{other}'"))),
    }
}

fn decode_vline(shape: &Value) -> Option<VLine> {
    if shape.get("type").and_then(Value::as_str) != Some("line") {
        return None;
    }
    let x0 = shape.get("x0").and_then(Value::as_f64)?;
    let x1 = shape.get("x1").and_then(Value::as_f64)?;
    if (x0 - x1).abs() > f64::EPSILON {
        return None;
    }
    let color = shape
        .get("line")
        .and_then(|l| l.get("color"))
        .and_then(Value::as_str)
        .and_then(parse_color);
    Some(VLine { x: x0, color })
}

/// `layout.title` is either a string or `{"text": ...}`; `<br>` becomes ` | `.
fn title_text(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("text")?.as_str()?,
        _ => return None,
    };
    let text = text.replace("<br>", " | ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn axis_title(layout: &Map<String, Value>, axis: &str) -> Option<String> {
    layout
        .get(axis)
        .and_then(|a| a.get("title"))
        .and_then(title_text)
}

/// `#rrggbb`, `rgb(r, g, b)`/`rgba(...)`, or one of the named colours the
/// analysis uses.
pub fn parse_color(raw: &str) -> Option<Rgb> {
    let s = raw.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            let v = u32::from_str_radix(hex, 16).ok()?;
            return Some(Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8));
        }
        return None;
    }
    if let Some(body) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|b| b.strip_suffix(')'))
    {
        let mut parts = body.split(',').map(|p| p.trim().parse::<f64>().ok());
        let r = parts.next()??;
        let g = parts.next()??;
        let b = parts.next()??;
        return Some(Rgb(r as u8, g as u8, b as u8));
    }
    let named = match s.to_ascii_lowercase().as_str() {
        "red" => Rgb(255, 0, 0),
        "green" => Rgb(0, 128, 0),
        "blue" => Rgb(0, 0, 255),
        "gray" | "grey" => Rgb(128, 128, 128),
        "lightblue" => Rgb(173, 216, 230),
        "orange" => Rgb(255, 165, 0),
        "black" => Rgb(0, 0, 0),
        "white" => Rgb(255, 255, 255),
        _ => return None,
    };
    Some(named)
}
