//! Figure model: traces plus layout, serialized as Plotly JSON.
//!
//! Any renderer that understands Plotly's `data`/`layout` shape can draw a
//! `Figure` as-is; the terminal dashboard reads the same structure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Candlestick,
    /// Always paired with `mode: "lines"`.
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl LineStyle {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.into(),
            width: Some(width),
            dash: None,
        }
    }

    pub fn dashed(color: &str) -> Self {
        Self {
            color: color.into(),
            width: Some(1.0),
            dash: Some("dash".into()),
        }
    }
}

/// A single color or one color per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorSpec {
    /// Color for point `i`, falling back to the first entry.
    pub fn at(&self, i: usize) -> Option<&str> {
        match self {
            ColorSpec::Single(c) => Some(c),
            ColorSpec::PerPoint(cs) => cs.get(i).or_else(|| cs.first()).map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: ColorSpec,
}

/// Candlestick rising/falling colors, Plotly's `increasing`/`decreasing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub name: String,
    pub x: Vec<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Vec<f64>>,
    /// Axis reference: `y`, `y2`, `y3`, ...
    pub yaxis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increasing: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decreasing: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Trace {
    fn empty(kind: TraceKind, name: &str, x: Vec<NaiveDate>, axis: usize) -> Self {
        Self {
            kind,
            mode: None,
            name: name.into(),
            x,
            y: None,
            open: None,
            high: None,
            low: None,
            close: None,
            yaxis: axis_ref(axis),
            line: None,
            marker: None,
            increasing: None,
            decreasing: None,
            opacity: None,
        }
    }

    pub fn line(name: &str, x: Vec<NaiveDate>, y: Vec<f64>, axis: usize, style: LineStyle) -> Self {
        Self {
            mode: Some("lines".into()),
            y: Some(y),
            line: Some(style),
            ..Self::empty(TraceKind::Scatter, name, x, axis)
        }
    }

    pub fn bar(name: &str, x: Vec<NaiveDate>, y: Vec<f64>, axis: usize, color: ColorSpec) -> Self {
        Self {
            y: Some(y),
            marker: Some(Marker { color }),
            ..Self::empty(TraceKind::Bar, name, x, axis)
        }
    }

    pub fn candlestick(name: &str, x: Vec<NaiveDate>, ohlc: [Vec<f64>; 4], axis: usize) -> Self {
        let [open, high, low, close] = ohlc;
        Self {
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            ..Self::empty(TraceKind::Candlestick, name, x, axis)
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Finite min/max over every value this trace plots.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        [&self.y, &self.open, &self.high, &self.low, &self.close]
            .into_iter()
            .flatten()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

impl Axis {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Horizontal reference line spanning the full width of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub xref: String,
    pub x0: f64,
    pub x1: f64,
    pub yref: String,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Shape {
    pub fn hline(y: f64, axis: usize, line: LineStyle, opacity: f64) -> Self {
        Self {
            kind: "line".into(),
            xref: "paper".into(),
            x0: 0.0,
            x1: 1.0,
            yref: axis_ref(axis),
            y0: y,
            y1: y,
            line,
            opacity: Some(opacity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub showlegend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub xaxis: Axis,
    /// `yaxis`, `yaxis2`, ... keyed as Plotly expects.
    #[serde(flatten)]
    pub yaxes: BTreeMap<String, Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: None,
            showlegend: false,
            template: Some("plotly_dark".into()),
            xaxis: Axis {
                rangeslider: Some(RangeSlider { visible: false }),
                ..Axis::default()
            },
            yaxes: BTreeMap::new(),
            shapes: Vec::new(),
        }
    }
}

impl Layout {
    pub fn axis(&self, n: usize) -> Option<&Axis> {
        self.yaxes.get(&axis_key(n))
    }

    pub fn set_axis(&mut self, n: usize, axis: Axis) {
        self.yaxes.insert(axis_key(n), axis);
    }

    /// Axis numbers with a domain, top panel first.
    pub fn panels(&self) -> Vec<(usize, [f64; 2])> {
        let mut panels: Vec<_> = self
            .yaxes
            .iter()
            .filter_map(|(key, axis)| Some((axis_number(key)?, axis.domain?)))
            .collect();
        panels.sort_by(|a, b| b.1[1].total_cmp(&a.1[1]));
        panels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn traces_on(&self, axis: usize) -> impl Iterator<Item = &Trace> + '_ {
        let axis = axis_ref(axis);
        self.data.iter().filter(move |t| t.yaxis == axis)
    }

    pub fn shapes_on(&self, axis: usize) -> impl Iterator<Item = &Shape> + '_ {
        let axis = axis_ref(axis);
        self.layout.shapes.iter().filter(move |s| s.yref == axis)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Trace-side axis reference: 1 → `y`, 2 → `y2`.
pub fn axis_ref(n: usize) -> String {
    if n <= 1 {
        "y".into()
    } else {
        format!("y{n}")
    }
}

/// Layout-side axis key: 1 → `yaxis`, 2 → `yaxis2`.
pub fn axis_key(n: usize) -> String {
    if n <= 1 {
        "yaxis".into()
    } else {
        format!("yaxis{n}")
    }
}

fn axis_number(key: &str) -> Option<usize> {
    let rest = key.strip_prefix("yaxis")?;
    if rest.is_empty() {
        Some(1)
    } else {
        rest.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn scatter_line_serializes_like_plotly() {
        let t = Trace::line("RSI", vec![d(2)], vec![55.0], 3, LineStyle::solid("#ffa726", 2.0));
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["type"], "scatter");
        assert_eq!(v["mode"], "lines");
        assert_eq!(v["x"], json!(["2024-01-02"]));
        assert_eq!(v["yaxis"], "y3");
        assert!(v.get("open").is_none());
    }

    #[test]
    fn layout_flattens_numbered_axes() {
        let mut layout = Layout::default();
        layout.set_axis(1, Axis { domain: Some([0.5, 1.0]), ..Axis::default() });
        layout.set_axis(2, Axis { domain: Some([0.0, 0.5]), ..Axis::default() });
        let v = serde_json::to_value(&layout).unwrap();
        assert_eq!(v["yaxis"]["domain"], json!([0.5, 1.0]));
        assert_eq!(v["yaxis2"]["domain"], json!([0.0, 0.5]));
        assert_eq!(v["xaxis"]["rangeslider"]["visible"], false);

        let back: Layout = serde_json::from_value(v).unwrap();
        assert_eq!(back.panels(), vec![(1, [0.5, 1.0]), (2, [0.0, 0.5])]);
    }

    #[test]
    fn nan_values_serialize_as_null() {
        let t = Trace::bar("Vol", vec![d(2)], vec![f64::NAN], 2, ColorSpec::Single("gray".into()));
        let v = serde_json::to_value(&t).unwrap();
        assert!(v["y"][0].is_null());
        assert_eq!(t.value_range(), None);
    }

    #[test]
    fn value_range_spans_ohlc() {
        let t = Trace::candlestick(
            "K",
            vec![d(2), d(3)],
            [vec![10.0, 11.0], vec![12.0, 15.0], vec![9.0, 10.5], vec![11.0, 14.0]],
            1,
        );
        assert_eq!(t.value_range(), Some((9.0, 15.0)));
    }
}
