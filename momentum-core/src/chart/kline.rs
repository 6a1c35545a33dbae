//! Candlestick and volume traces.

use super::figure::{Axis, ColorSpec, Direction, Figure, Layout, LineStyle, Trace};
use super::{palette, ShapeError};
use crate::domain::PriceSeries;

/// Candlestick figure over the trailing `period_days` entries (all entries
/// when fewer exist).
pub fn shape_kline(
    stock_id: &str,
    series: Option<&PriceSeries>,
    period_days: usize,
) -> Result<Figure, ShapeError> {
    let series = series
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ShapeError::NoDataForStock {
            stock_id: stock_id.to_string(),
        })?;
    let start = series.window_start(period_days);

    let mut candles = Trace::candlestick(
        "K-line",
        series.dates()[start..].to_vec(),
        [
            series.open()[start..].to_vec(),
            series.high()[start..].to_vec(),
            series.low()[start..].to_vec(),
            series.close()[start..].to_vec(),
        ],
        1,
    );
    candles.increasing = Some(Direction {
        line: LineStyle::solid(palette::UP, 1.0),
    });
    candles.decreasing = Some(Direction {
        line: LineStyle::solid(palette::DOWN, 1.0),
    });

    let mut layout = Layout {
        title: Some(format!("{stock_id} K-line ({}d)", series.len() - start)),
        ..Layout::default()
    };
    layout.set_axis(
        1,
        Axis {
            domain: Some([0.0, 1.0]),
            ..Axis::titled("Price")
        },
    );

    Ok(Figure {
        data: vec![candles],
        layout,
    })
}

/// Volume bars over the same window, colored by the day's direction.
pub fn shape_volume(series: &PriceSeries, period_days: usize, axis: usize) -> Trace {
    let start = series.window_start(period_days);
    let colors = series.open()[start..]
        .iter()
        .zip(&series.close()[start..])
        .map(|(open, close)| {
            if close >= open {
                palette::UP.to_string()
            } else {
                palette::DOWN.to_string()
            }
        })
        .collect();

    Trace::bar(
        "Volume",
        series.dates()[start..].to_vec(),
        series.volume()[start..].to_vec(),
        axis,
        ColorSpec::PerPoint(colors),
    )
    .with_opacity(0.7)
}
