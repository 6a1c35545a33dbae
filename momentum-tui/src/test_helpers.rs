//! Test helpers for creating mock data

use chrono::NaiveDate;

use momentum_core::data::LoadedData;
use momentum_core::domain::{IndicatorSeries, MomentumEntry, MomentumHistory, PriceSeries, StockPrices};

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn entry(name: &str, momentum: f64, days: u32) -> MomentumEntry {
    MomentumEntry {
        stock_name: name.to_string(),
        momentum,
        days: Some(days),
    }
}

/// Three stocks over two days. Latest scores: 2330 → 7.5, 2454 → 3.0,
/// 2317 → -1.0.
pub fn history() -> MomentumHistory {
    let mut h = MomentumHistory::new();
    h.insert(date(1, 2), String::from("2330"), entry("TSMC", 5.0, 2));
    h.insert(date(1, 2), String::from("2317"), entry("Hon Hai", 1.2, 1));
    h.insert(date(1, 3), String::from("2330"), entry("TSMC", 7.5, 3));
    h.insert(date(1, 3), String::from("2317"), entry("Hon Hai", -1.0, 0));
    h.insert(date(1, 3), String::from("2454"), entry("MediaTek", 3.0, 1));
    h
}

pub fn loaded_data() -> LoadedData {
    LoadedData {
        history: history(),
        ..LoadedData::default()
    }
}

/// 120 daily bars with full MACD and RSI coverage.
pub fn stock_prices(name: &str) -> StockPrices {
    let n = 120;
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| date(1, 1) + chrono::Duration::days(i as i64))
        .collect();
    let close: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0).collect();
    let open: Vec<f64> = close.iter().enumerate().map(|(i, c)| if i % 2 == 0 { c - 1.0 } else { c + 1.0 }).collect();
    let high = close.iter().map(|c| c + 2.0).collect();
    let low = close.iter().map(|c| c - 2.0).collect();
    StockPrices {
        name: Some(name.to_string()),
        prices: PriceSeries::new(dates, open, high, low, close, vec![1_000.0; n]).unwrap(),
        indicators: Some(IndicatorSeries {
            dates: None,
            macd: Some(vec![0.5; n]),
            signal: Some(vec![0.3; n]),
            histogram: Some(vec![0.2; n]),
            rsi: Some(vec![55.0; n]),
        }),
    }
}
