//! Domain types: momentum history and the price/indicator series behind charts.

pub mod momentum;
pub mod prices;

pub use momentum::{MomentumEntry, MomentumHistory, MomentumRecord};
pub use prices::{IndicatorSeries, PriceBook, PriceSeries, StockPrices};
