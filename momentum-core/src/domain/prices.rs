//! Price and indicator series consumed by the chart shaper.
//!
//! Both are parallel-array structures as delivered by the data payloads.
//! Construction validates the parallel-array invariants once, so the shaper
//! can index without bounds anxiety.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV series for one stock, chronologically ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl PriceSeries {
    /// Build a series, rejecting mismatched lengths and non-ascending dates.
    pub fn new(
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self, String> {
        let n = dates.len();
        for (label, len) in [
            ("open", open.len()),
            ("high", high.len()),
            ("low", low.len()),
            ("close", close.len()),
            ("volume", volume.len()),
        ] {
            if len != n {
                return Err(format!("{label} has {len} values but there are {n} dates"));
            }
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!("dates not strictly ascending at {} -> {}", w[0], w[1]));
        }
        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Start index of the trailing window of at most `period` entries.
    pub fn window_start(&self, period: usize) -> usize {
        self.len().saturating_sub(period)
    }
}

/// Precomputed MACD/RSI arrays. Each array may be shorter than the price
/// series; it then covers the most recent dates only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub macd: Option<Vec<f64>>,
    #[serde(default)]
    pub signal: Option<Vec<f64>>,
    #[serde(default)]
    pub histogram: Option<Vec<f64>>,
    #[serde(default)]
    pub rsi: Option<Vec<f64>>,
}

impl IndicatorSeries {
    pub fn has_macd(&self) -> bool {
        self.macd.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_rsi(&self) -> bool {
        self.rsi.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Dates for an indicator array of `len` values.
    ///
    /// Uses the indicator's own dates when they are long enough, otherwise
    /// the suffix of the price dates. Returns `None` when neither covers it.
    pub fn dates_for<'a>(&'a self, len: usize, price_dates: &'a [NaiveDate]) -> Option<&'a [NaiveDate]> {
        if let Some(own) = self.dates.as_deref() {
            if own.len() >= len {
                return Some(&own[own.len() - len..]);
            }
        }
        if price_dates.len() >= len {
            Some(&price_dates[price_dates.len() - len..])
        } else {
            None
        }
    }
}

/// Everything the chart panels need for one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrices {
    pub name: Option<String>,
    pub prices: PriceSeries,
    pub indicators: Option<IndicatorSeries>,
}

/// Stock id → price data.
pub type PriceBook = BTreeMap<String, StockPrices>;
