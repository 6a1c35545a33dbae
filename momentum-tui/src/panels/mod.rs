//! Dashboard widgets
//!
//! Core panels:
//! - MomentumTable: score grid with future placeholder columns
//! - Candles: OHLC candle rendering for K-line traces
//! - Figure: stacked chart figure (K-line, volume, MACD, RSI, trend)

pub mod candles;
pub mod figure;
pub mod momentum_table;

pub use candles::{CandlePanel, OhlcBar};
pub use figure::FigurePanel;
pub use momentum_table::MomentumTablePanel;
