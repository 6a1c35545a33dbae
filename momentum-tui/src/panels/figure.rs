//! Figure panel - draws a shaped chart figure in the terminal
//!
//! Each y-axis domain becomes a horizontal band of the area, top panel first.
//! Candlestick panels go through [`CandlePanel`]; lines, bars and reference
//! lines are drawn with ratatui's `Chart` on a shared date index so stacked
//! panels line up.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    widgets::{Axis as ChartAxis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use momentum_core::chart::{Figure, Trace, TraceKind};

use super::candles::{bars_from_trace, CandlePanel};
use crate::theme::Theme;

/// Band of `area` covered by a vertical paper domain `[bottom, top]`.
pub fn panel_rect(area: Rect, domain: [f64; 2]) -> Rect {
    let h = area.height as f64;
    let top = ((1.0 - domain[1]) * h).round().clamp(0.0, h) as u16;
    let bottom = ((1.0 - domain[0]) * h).round().clamp(0.0, h) as u16;
    Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: bottom.saturating_sub(top),
    }
}

/// Position of every plotted date across the whole figure.
struct DateIndex(BTreeMap<NaiveDate, f64>);

impl DateIndex {
    fn new(figure: &Figure) -> Self {
        let mut dates: Vec<NaiveDate> = figure.data.iter().flat_map(|t| t.x.iter().copied()).collect();
        dates.sort_unstable();
        dates.dedup();
        Self(dates.into_iter().enumerate().map(|(i, d)| (d, i as f64)).collect())
    }

    fn x(&self, date: &NaiveDate) -> Option<f64> {
        self.0.get(date).copied()
    }

    fn bounds(&self) -> [f64; 2] {
        [0.0, (self.0.len().saturating_sub(1) as f64).max(1.0)]
    }
}

struct Series {
    points: Vec<(f64, f64)>,
    style: Style,
    graph: GraphType,
}

/// Figure panel widget
pub struct FigurePanel<'a> {
    figure: &'a Figure,
    theme: &'a Theme,
}

impl<'a> FigurePanel<'a> {
    pub fn new(figure: &'a Figure, theme: &'a Theme) -> Self {
        Self { figure, theme }
    }

    fn trace_style(&self, color: &str, trace: &Trace) -> Style {
        let style = Style::default().fg(self.theme.series_color(color));
        match trace.opacity {
            Some(o) if o < 1.0 => style.add_modifier(Modifier::DIM),
            _ => style,
        }
    }

    fn series_for(&self, trace: &Trace, index: &DateIndex) -> Vec<Series> {
        let Some(ys) = &trace.y else {
            return Vec::new();
        };
        let points = trace
            .x
            .iter()
            .zip(ys)
            .enumerate()
            .filter(|(_, (_, y))| y.is_finite())
            .filter_map(|(i, (d, &y))| Some((i, (index.x(d)?, y))));

        match trace.kind {
            TraceKind::Bar => {
                let mut by_color: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
                for (i, point) in points {
                    let color = match &trace.marker {
                        Some(marker) => marker.color.at(i).unwrap_or(""),
                        None => "",
                    };
                    by_color.entry(color).or_default().push(point);
                }
                by_color
                    .into_iter()
                    .map(|(color, points)| Series {
                        points,
                        style: self.trace_style(color, trace),
                        graph: GraphType::Bar,
                    })
                    .collect()
            }
            _ => {
                let color = trace.line.as_ref().map(|l| l.color.as_str()).unwrap_or("");
                vec![Series {
                    points: points.map(|(_, p)| p).collect(),
                    style: self.trace_style(color, trace),
                    graph: GraphType::Line,
                }]
            }
        }
    }

    fn y_bounds(&self, axis: usize, traces: &[&Trace]) -> [f64; 2] {
        if let Some(range) = self.figure.layout.axis(axis).and_then(|a| a.range) {
            return range;
        }
        let values = traces
            .iter()
            .filter_map(|t| t.value_range())
            .flat_map(|(lo, hi)| [lo, hi])
            .chain(self.figure.shapes_on(axis).map(|s| s.y0));
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !lo.is_finite() || !hi.is_finite() {
            return [0.0, 1.0];
        }
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        [lo - pad, hi + pad]
    }

    fn render_series_panel(&self, axis: usize, title: &str, area: Rect, index: &DateIndex, buf: &mut Buffer) {
        let traces: Vec<&Trace> = self.figure.traces_on(axis).collect();
        let x_bounds = index.bounds();
        let y_bounds = self.y_bounds(axis, &traces);

        let mut series: Vec<Series> = traces.iter().flat_map(|t| self.series_for(t, index)).collect();
        for shape in self.figure.shapes_on(axis) {
            let style = Style::default()
                .fg(self.theme.series_color(&shape.line.color))
                .add_modifier(Modifier::DIM);
            series.push(Series {
                points: vec![(x_bounds[0], shape.y0), (x_bounds[1], shape.y0)],
                style,
                graph: GraphType::Line,
            });
        }

        let names: Vec<&str> = traces.iter().map(|t| t.name.as_str()).collect();
        let block = Block::default()
            .title(format!(" {} | {} ", title, names.join(" ")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted))
            .style(Style::default().bg(self.theme.background));

        let datasets = series
            .iter()
            .map(|s| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(s.graph)
                    .style(s.style)
                    .data(&s.points)
            })
            .collect();

        let label_style = Style::default().fg(self.theme.muted);
        let mid = (y_bounds[0] + y_bounds[1]) / 2.0;
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(ChartAxis::default().bounds(x_bounds).style(label_style))
            .y_axis(
                ChartAxis::default()
                    .bounds(y_bounds)
                    .style(label_style)
                    .labels([
                        format!("{:.1}", y_bounds[0]),
                        format!("{:.1}", mid),
                        format!("{:.1}", y_bounds[1]),
                    ]),
            );
        chart.render(area, buf);
    }
}

impl<'a> Widget for FigurePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let panels = self.figure.layout.panels();
        if panels.is_empty() || self.figure.data.is_empty() {
            Block::default()
                .title(" Chart [No Data] ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background))
                .render(area, buf);
            return;
        }

        let index = DateIndex::new(self.figure);
        for (axis, domain) in panels {
            let rect = panel_rect(area, domain);
            if rect.height < 3 {
                continue;
            }
            let title = self
                .figure
                .layout
                .axis(axis)
                .and_then(|a| a.title.as_deref())
                .unwrap_or("");

            match self.figure.traces_on(axis).find(|t| t.kind == TraceKind::Candlestick) {
                Some(kline) => {
                    let bars = bars_from_trace(kline);
                    CandlePanel::new(&bars, title, self.theme)
                        .colors_from(kline)
                        .render(rect, buf);
                }
                None => self.render_series_panel(axis, title, rect, &index, buf),
            }
        }
    }
}
