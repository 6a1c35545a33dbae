//! One stacked figure: K-line on top, then volume, MACD, RSI.

use super::indicators::{active_panels, stack_panels};
use super::kline::shape_kline;
use super::{ChartOptions, Figure, ShapeError};
use crate::domain::StockPrices;

pub fn compose_price_figure(
    stock_id: &str,
    stock: Option<&StockPrices>,
    options: &ChartOptions,
) -> Result<Figure, ShapeError> {
    let Some(stock) = stock else {
        return Err(ShapeError::NoDataForStock {
            stock_id: stock_id.to_string(),
        });
    };
    let kline = shape_kline(stock_id, Some(&stock.prices), options.period_days)?;

    let panels = active_panels(Some(&stock.prices), stock.indicators.as_ref(), options);
    let mut figure = stack_panels(
        &panels,
        stock.prices.dates(),
        Some(&stock.prices),
        stock.indicators.as_ref(),
        options,
    );

    let mut traces = kline.data;
    traces.append(&mut figure.data);
    figure.data = traces;

    let title = match &stock.name {
        Some(name) => format!("{name} ({stock_id})"),
        None => stock_id.to_string(),
    };
    figure.layout.title = Some(format!("{title} · {}d", options.period_days));
    Ok(figure)
}
