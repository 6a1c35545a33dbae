//! Wire formats for the history and price payloads.
//!
//! Both payloads are parsed through private `Wire*` structs and then validated
//! into domain types. Parsing is tolerant per record: a broken stock or a
//! record without a usable score is left out, and the reason travels back in
//! [`Parsed::rejected`] so it reaches the user.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::{DataError, Parsed};
use crate::domain::{IndicatorSeries, MomentumEntry, MomentumHistory, PriceBook, PriceSeries, StockPrices};

#[derive(Debug, Deserialize)]
struct WireHistory {
    #[serde(default)]
    dates: Option<BTreeMap<String, BTreeMap<String, WireEntry>>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(default)]
    stock_name: Option<String>,
    #[serde(default)]
    momentum: Option<f64>,
    #[serde(default)]
    days: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireStock {
    #[serde(default)]
    name: Option<String>,
    price_data: WirePriceData,
    #[serde(default)]
    indicators: Option<WireIndicators>,
}

#[derive(Debug, Deserialize)]
struct WirePriceData {
    dates: Vec<String>,
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
    #[serde(default)]
    indicators: Option<WireIndicators>,
}

#[derive(Debug, Default, Deserialize)]
struct WireIndicators {
    #[serde(default)]
    dates: Option<Vec<String>>,
    #[serde(default)]
    macd: Option<Vec<Option<f64>>>,
    #[serde(default)]
    signal: Option<Vec<Option<f64>>>,
    #[serde(default)]
    histogram: Option<Vec<Option<f64>>>,
    #[serde(default)]
    rsi: Option<Vec<Option<f64>>>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}"))
}

/// JSON `null` in a numeric array becomes NaN, which serializes back as `null`.
fn fill_nulls(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

/// Parse a history payload.
///
/// A set `error` field or a missing `dates` object is a `MalformedPayload`.
/// Entries with a null or non-finite momentum are dropped and summarized in
/// one rejection line.
pub fn parse_history(bytes: &[u8]) -> Result<Parsed<MomentumHistory>, DataError> {
    let wire: WireHistory = serde_json::from_slice(bytes)
        .map_err(|e| DataError::MalformedPayload(format!("history is not valid JSON: {e}")))?;

    if let Some(err) = wire.error {
        return Err(DataError::MalformedPayload(err));
    }
    let dates = wire
        .dates
        .ok_or_else(|| DataError::MalformedPayload("history has no `dates` object".into()))?;

    let mut history = MomentumHistory::new();
    let mut dropped: Vec<(NaiveDate, String)> = Vec::new();
    for (raw_date, stocks) in dates {
        let date = parse_date(&raw_date).map_err(DataError::MalformedPayload)?;
        for (stock_id, entry) in stocks {
            let Some(momentum) = entry.momentum.filter(|m| m.is_finite()) else {
                debug!(%date, stock_id = %stock_id, "dropping record without a finite momentum");
                dropped.push((date, stock_id));
                continue;
            };
            let days = entry
                .days
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d as u32);
            let stock_name = entry.stock_name.unwrap_or_else(|| stock_id.clone());
            history.insert(
                date,
                stock_id,
                MomentumEntry {
                    stock_name,
                    momentum,
                    days,
                },
            );
        }
    }

    let rejected = match dropped.first() {
        Some((date, stock_id)) => vec![format!(
            "history: dropped {} record(s) without a numeric momentum (first: {stock_id} on {date})",
            dropped.len()
        )],
        None => Vec::new(),
    };
    Ok(Parsed {
        value: history,
        rejected,
    })
}

fn convert_indicators(wire: WireIndicators) -> Result<IndicatorSeries, String> {
    let dates = wire
        .dates
        .map(|ds| ds.iter().map(|d| parse_date(d)).collect::<Result<Vec<_>, _>>())
        .transpose()?;
    Ok(IndicatorSeries {
        dates,
        macd: wire.macd.map(fill_nulls),
        signal: wire.signal.map(fill_nulls),
        histogram: wire.histogram.map(fill_nulls),
        rsi: wire.rsi.map(fill_nulls),
    })
}

fn convert_stock(wire: WireStock) -> Result<StockPrices, String> {
    let WirePriceData {
        dates,
        open,
        high,
        low,
        close,
        volume,
        indicators: nested,
    } = wire.price_data;

    let dates = dates
        .iter()
        .map(|d| parse_date(d))
        .collect::<Result<Vec<_>, _>>()?;
    let prices = PriceSeries::new(
        dates,
        fill_nulls(open),
        fill_nulls(high),
        fill_nulls(low),
        fill_nulls(close),
        fill_nulls(volume),
    )?;

    // The static generator writes `indicators` beside `price_data`; the
    // backend nests it. Prefer the nested form when both are present.
    let indicators = nested.or(wire.indicators).map(convert_indicators).transpose()?;

    Ok(StockPrices {
        name: wire.name,
        prices,
        indicators,
    })
}

/// Parse a bulk price payload. Stocks that fail validation are left out of
/// the book, one rejection line each.
pub fn parse_price_book(bytes: &[u8]) -> Result<Parsed<PriceBook>, DataError> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|e| DataError::MalformedPayload(format!("price data is not a JSON object: {e}")))?;

    let mut book = PriceBook::new();
    let mut rejected = Vec::new();
    for (stock_id, value) in raw {
        let parsed = serde_json::from_value::<WireStock>(value)
            .map_err(|e| e.to_string())
            .and_then(convert_stock);
        match parsed {
            Ok(stock) => {
                book.insert(stock_id, stock);
            }
            Err(reason) => {
                warn!(stock_id = %stock_id, %reason, "rejecting price data for stock");
                rejected.push(format!("price data for {stock_id} rejected: {reason}"));
            }
        }
    }
    Ok(Parsed { value: book, rejected })
}

/// Parse a single-stock price payload (the per-stock HTTP endpoint).
pub fn parse_stock(stock_id: &str, bytes: &[u8]) -> Result<StockPrices, DataError> {
    let wire: WireStock = serde_json::from_slice(bytes)
        .map_err(|e| DataError::MalformedPayload(format!("price data for {stock_id}: {e}")))?;
    convert_stock(wire).map_err(|reason| DataError::MalformedPayload(format!("price data for {stock_id}: {reason}")))
}
