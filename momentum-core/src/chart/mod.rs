//! Chart data shaping.
//!
//! Turns a stock's price/indicator series (or its momentum history) into a
//! [`Figure`]: a list of typed traces plus a stacked-panel layout. Shaping is
//! pure; drawing is left to whoever consumes the figure.

pub mod compose;
pub mod figure;
pub mod indicators;
pub mod kline;
pub mod trend;

pub use compose::compose_price_figure;
pub use figure::{Axis, ColorSpec, Figure, Layout, LineStyle, Shape, Trace, TraceKind};
pub use indicators::{panel_domains, shape_indicators, SubPanel};
pub use kline::{shape_kline, shape_volume};
pub use trend::shape_momentum_trend;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ChartConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("no chart data for stock '{stock_id}'")]
    NoDataForStock { stock_id: String },
}

/// Series colors.
pub mod palette {
    pub const UP: &str = "#ff6b6b";
    pub const DOWN: &str = "#4ecdc4";
    pub const MACD: &str = "#ff6b6b";
    pub const SIGNAL: &str = "#4ecdc4";
    pub const HISTOGRAM: &str = "gray";
    pub const RSI: &str = "#ffa726";
    pub const OVERBOUGHT: &str = "red";
    pub const OVERSOLD: &str = "green";
    pub const REFERENCE: &str = "white";
    pub const TREND: &str = "#42a5f5";
}

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_MIDLINE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorToggles {
    pub macd: bool,
    pub rsi: bool,
}

impl Default for IndicatorToggles {
    fn default() -> Self {
        Self { macd: true, rsi: true }
    }
}

/// Everything the shaper needs besides the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub period_days: usize,
    pub toggles: IndicatorToggles,
    pub show_volume: bool,
    /// K-line height fraction when at least one sub-panel is shown.
    pub kline_share: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl ChartOptions {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            period_days: config.default_period,
            toggles: IndicatorToggles {
                macd: config.macd,
                rsi: config.rsi,
            },
            show_volume: config.show_volume,
            kline_share: config.kline_share,
        }
    }
}
