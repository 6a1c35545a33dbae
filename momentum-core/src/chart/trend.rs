//! Momentum trend line, drawn from the history alone.

use super::figure::{Axis, Figure, Layout, LineStyle, Shape, Trace};
use super::{palette, ShapeError};
use crate::domain::MomentumHistory;

pub fn shape_momentum_trend(history: &MomentumHistory, stock_id: &str) -> Result<Figure, ShapeError> {
    let series = history.series_for(stock_id);
    if series.is_empty() {
        return Err(ShapeError::NoDataForStock {
            stock_id: stock_id.to_string(),
        });
    }
    let (dates, values): (Vec<_>, Vec<_>) = series.into_iter().unzip();
    let name = history.stock_name(stock_id).unwrap_or(stock_id);

    let mut layout = Layout {
        title: Some(format!("{name} ({stock_id}) momentum")),
        shapes: vec![Shape::hline(0.0, 1, LineStyle::dashed(palette::REFERENCE), 0.5)],
        ..Layout::default()
    };
    layout.set_axis(
        1,
        Axis {
            domain: Some([0.0, 1.0]),
            ..Axis::titled("Momentum (%)")
        },
    );

    Ok(Figure {
        data: vec![Trace::line(
            "Momentum",
            dates,
            values,
            1,
            LineStyle::solid(palette::TREND, 2.0),
        )],
        layout,
    })
}
