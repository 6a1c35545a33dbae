//! MACD/RSI panels and the stacked-panel layout.
//!
//! The K-line always owns axis 1 at the top. Sub-panels (volume, MACD, RSI)
//! take axes 2.. in that order and split the remaining height evenly.

use chrono::NaiveDate;
use tracing::debug;

use super::figure::{Axis, ColorSpec, Figure, Layout, LineStyle, Shape, Trace};
use super::kline::shape_volume;
use super::{palette, ChartOptions, RSI_MIDLINE, RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::domain::{IndicatorSeries, PriceSeries};

/// A panel stacked under the K-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPanel {
    Volume,
    Macd,
    Rsi,
}

impl SubPanel {
    pub fn title(self) -> &'static str {
        match self {
            SubPanel::Volume => "Volume",
            SubPanel::Macd => "MACD",
            SubPanel::Rsi => "RSI",
        }
    }
}

/// Vertical domains, K-line first, then each sub-panel top to bottom.
///
/// With no sub-panels the K-line spans the full height.
pub fn panel_domains(kline_share: f64, sub_panels: usize) -> Vec<[f64; 2]> {
    if sub_panels == 0 {
        return vec![[0.0, 1.0]];
    }
    let kline_bottom = 1.0 - kline_share.clamp(0.0, 1.0);
    let each = kline_bottom / sub_panels as f64;

    let mut domains = Vec::with_capacity(sub_panels + 1);
    domains.push([kline_bottom, 1.0]);
    for i in 0..sub_panels {
        let top = kline_bottom - each * i as f64;
        let bottom = if i + 1 == sub_panels { 0.0 } else { top - each };
        domains.push([bottom, top]);
    }
    domains
}

/// Indicator values with their dates, trimmed to the chart's look-back.
struct Aligned {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

fn align(
    name: &str,
    values: &[f64],
    indicators: &IndicatorSeries,
    price_dates: &[NaiveDate],
    period_days: usize,
) -> Option<Aligned> {
    let Some(dates) = indicators.dates_for(values.len(), price_dates) else {
        debug!(series = name, len = values.len(), "indicator longer than its dates, skipping");
        return None;
    };

    let mut start = values.len().saturating_sub(period_days);
    if let Some(cutoff) = price_dates.get(price_dates.len().saturating_sub(period_days)) {
        start = start.max(dates.partition_point(|d| d < cutoff));
    }
    Some(Aligned {
        dates: dates[start..].to_vec(),
        values: values[start..].to_vec(),
    })
}

fn macd_panel(
    indicators: &IndicatorSeries,
    price_dates: &[NaiveDate],
    period_days: usize,
    axis: usize,
    figure: &mut Figure,
) {
    let series = [
        ("MACD", indicators.macd.as_deref(), palette::MACD),
        ("Signal", indicators.signal.as_deref(), palette::SIGNAL),
    ];
    for (name, values, color) in series {
        if let Some(a) = values.and_then(|v| align(name, v, indicators, price_dates, period_days)) {
            figure
                .data
                .push(Trace::line(name, a.dates, a.values, axis, LineStyle::solid(color, 2.0)));
        }
    }
    if let Some(a) = indicators
        .histogram
        .as_deref()
        .and_then(|v| align("Histogram", v, indicators, price_dates, period_days))
    {
        figure.data.push(
            Trace::bar(
                "Histogram",
                a.dates,
                a.values,
                axis,
                ColorSpec::Single(palette::HISTOGRAM.into()),
            )
            .with_opacity(0.5),
        );
    }
    figure
        .layout
        .shapes
        .push(Shape::hline(0.0, axis, LineStyle::dashed(palette::REFERENCE), 0.5));
}

fn rsi_panel(
    indicators: &IndicatorSeries,
    price_dates: &[NaiveDate],
    period_days: usize,
    axis: usize,
    figure: &mut Figure,
) {
    let Some(a) = indicators
        .rsi
        .as_deref()
        .and_then(|v| align("RSI", v, indicators, price_dates, period_days))
    else {
        return;
    };

    let n = a.dates.len();
    figure.data.push(Trace::line(
        "Overbought (70)",
        a.dates.clone(),
        vec![RSI_OVERBOUGHT; n],
        axis,
        LineStyle::dashed(palette::OVERBOUGHT),
    ));
    figure.data.push(Trace::line(
        "Oversold (30)",
        a.dates.clone(),
        vec![RSI_OVERSOLD; n],
        axis,
        LineStyle::dashed(palette::OVERSOLD),
    ));
    figure.data.push(Trace::line(
        "RSI",
        a.dates,
        a.values,
        axis,
        LineStyle::solid(palette::RSI, 2.0),
    ));
    figure.layout.shapes.push(Shape::hline(
        RSI_MIDLINE,
        axis,
        LineStyle::solid(palette::REFERENCE, 1.0),
        0.3,
    ));
}

/// Sub-panels that are both enabled and backed by data, in stacking order.
pub(crate) fn active_panels(
    prices: Option<&PriceSeries>,
    indicators: Option<&IndicatorSeries>,
    options: &ChartOptions,
) -> Vec<SubPanel> {
    let mut panels = Vec::new();
    if options.show_volume && prices.is_some() {
        panels.push(SubPanel::Volume);
    }
    if let Some(ind) = indicators {
        if options.toggles.macd && ind.has_macd() {
            panels.push(SubPanel::Macd);
        }
        if options.toggles.rsi && ind.has_rsi() {
            panels.push(SubPanel::Rsi);
        }
    }
    panels
}

/// Build the sub-panel stack. Axis 1 gets the K-line domain but no traces.
///
/// `price_dates` drives indicator alignment; `prices` is only needed for the
/// volume panel.
pub(crate) fn stack_panels(
    panels: &[SubPanel],
    price_dates: &[NaiveDate],
    prices: Option<&PriceSeries>,
    indicators: Option<&IndicatorSeries>,
    options: &ChartOptions,
) -> Figure {
    let domains = panel_domains(options.kline_share, panels.len());

    let mut figure = Figure {
        data: Vec::new(),
        layout: Layout {
            showlegend: panels.iter().any(|p| *p != SubPanel::Volume),
            ..Layout::default()
        },
    };
    figure.layout.set_axis(
        1,
        Axis {
            domain: Some(domains[0]),
            ..Axis::titled("Price")
        },
    );

    for (i, panel) in panels.iter().enumerate() {
        let axis = i + 2;
        let mut y = Axis {
            domain: Some(domains[i + 1]),
            anchor: Some("x".into()),
            ..Axis::titled(panel.title())
        };
        match panel {
            SubPanel::Volume => {
                if let Some(series) = prices {
                    figure.data.push(shape_volume(series, options.period_days, axis));
                }
            }
            SubPanel::Macd => {
                if let Some(ind) = indicators {
                    macd_panel(ind, price_dates, options.period_days, axis, &mut figure);
                }
            }
            SubPanel::Rsi => {
                y.range = Some([0.0, 100.0]);
                if let Some(ind) = indicators {
                    rsi_panel(ind, price_dates, options.period_days, axis, &mut figure);
                }
            }
        }
        figure.layout.set_axis(axis, y);
    }
    figure
}

/// Indicator panels for one stock, stacked below a reserved K-line slot.
///
/// Arrays shorter than the price series are aligned to the most recent
/// `len` price dates; nothing is padded.
pub fn shape_indicators(
    indicators: &IndicatorSeries,
    price_dates: &[NaiveDate],
    options: &ChartOptions,
) -> Figure {
    let panels = active_panels(None, Some(indicators), options);
    stack_panels(&panels, price_dates, None, Some(indicators), options)
}
