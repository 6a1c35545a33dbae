//! Momentum history: the per-date, per-stock score snapshot.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::DataError;

/// One stock's momentum fragment on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumEntry {
    pub stock_name: String,
    pub momentum: f64,
    /// Consecutive days the stock has held its momentum state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

/// Flattened view of a single (stock, date) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumRecord<'a> {
    pub stock_id: &'a str,
    pub stock_name: &'a str,
    pub date: NaiveDate,
    pub momentum_percent: f64,
    pub streak_days: Option<u32>,
}

/// Date → stock id → entry.
///
/// Dates are parsed keys, so iteration order is chronological by construction.
/// A history is loaded wholesale and replaced on refresh, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumHistory {
    dates: BTreeMap<NaiveDate, BTreeMap<String, MomentumEntry>>,
}

impl MomentumHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates(dates: BTreeMap<NaiveDate, BTreeMap<String, MomentumEntry>>) -> Self {
        Self { dates }
    }

    /// Insert or replace one stock's entry on a date.
    pub fn insert(&mut self, date: NaiveDate, stock_id: impl Into<String>, entry: MomentumEntry) {
        self.dates
            .entry(date)
            .or_default()
            .insert(stock_id.into(), entry);
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Distinct dates, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.keys().copied()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.keys().next_back().copied()
    }

    pub fn entries_on(&self, date: NaiveDate) -> Option<&BTreeMap<String, MomentumEntry>> {
        self.dates.get(&date)
    }

    pub fn entry(&self, date: NaiveDate, stock_id: &str) -> Option<&MomentumEntry> {
        self.dates.get(&date).and_then(|stocks| stocks.get(stock_id))
    }

    /// Every (date, stock) observation in encounter order: ascending date,
    /// then ascending stock id.
    pub fn records(&self) -> impl Iterator<Item = MomentumRecord<'_>> + '_ {
        self.dates.iter().flat_map(|(date, stocks)| {
            stocks.iter().map(move |(id, entry)| MomentumRecord {
                stock_id: id.as_str(),
                stock_name: entry.stock_name.as_str(),
                date: *date,
                momentum_percent: entry.momentum,
                streak_days: entry.days,
            })
        })
    }

    /// Union of stock ids across all dates.
    pub fn stock_ids(&self) -> BTreeSet<&str> {
        self.dates
            .values()
            .flat_map(|stocks| stocks.keys().map(|k| k.as_str()))
            .collect()
    }

    /// One stock's momentum values in ascending date order.
    pub fn series_for(&self, stock_id: &str) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .filter_map(|(date, stocks)| stocks.get(stock_id).map(|e| (*date, e.momentum)))
            .collect()
    }

    /// Most recent display name recorded for a stock.
    pub fn stock_name(&self, stock_id: &str) -> Option<&str> {
        self.dates
            .values()
            .rev()
            .find_map(|stocks| stocks.get(stock_id))
            .map(|e| e.stock_name.as_str())
    }

    /// Fail with `EmptyHistory` for callers that cannot degrade to an empty view.
    pub fn require_non_empty(&self) -> Result<&Self, DataError> {
        if self.is_empty() {
            Err(DataError::EmptyHistory)
        } else {
            Ok(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(name: &str, momentum: f64) -> MomentumEntry {
        MomentumEntry {
            stock_name: name.into(),
            momentum,
            days: None,
        }
    }

    #[test]
    fn dates_iterate_chronologically_regardless_of_insert_order() {
        let mut h = MomentumHistory::new();
        h.insert(d(2024, 1, 3), "2330", entry("TSMC", 7.5));
        h.insert(d(2023, 12, 29), "2330", entry("TSMC", 1.0));
        h.insert(d(2024, 1, 2), "2330", entry("TSMC", 5.0));

        let dates: Vec<_> = h.dates().collect();
        assert_eq!(dates, vec![d(2023, 12, 29), d(2024, 1, 2), d(2024, 1, 3)]);
        assert_eq!(h.latest_date(), Some(d(2024, 1, 3)));
    }

    #[test]
    fn stock_name_prefers_latest_date() {
        let mut h = MomentumHistory::new();
        h.insert(d(2024, 1, 2), "2330", entry("TSMC old", 5.0));
        h.insert(d(2024, 1, 3), "2330", entry("TSMC", 7.5));
        assert_eq!(h.stock_name("2330"), Some("TSMC"));
        assert_eq!(h.stock_name("9999"), None);
    }

    #[test]
    fn series_for_skips_dates_without_record() {
        let mut h = MomentumHistory::new();
        h.insert(d(2024, 1, 2), "2330", entry("TSMC", 5.0));
        h.insert(d(2024, 1, 3), "2317", entry("Foxconn", 2.0));
        h.insert(d(2024, 1, 4), "2330", entry("TSMC", 6.0));

        assert_eq!(
            h.series_for("2330"),
            vec![(d(2024, 1, 2), 5.0), (d(2024, 1, 4), 6.0)]
        );
    }

    #[test]
    fn empty_history_is_rejected_only_on_request() {
        let h = MomentumHistory::new();
        assert!(h.latest_date().is_none());
        assert!(matches!(h.require_non_empty(), Err(DataError::EmptyHistory)));
    }
}
