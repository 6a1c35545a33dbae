//! Per-stock rows aligned to the column set.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::columns::DateColumn;
use crate::domain::MomentumHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// One stock aggregated across every date.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRow {
    pub stock_id: String,
    /// Name from the most recent date on which the stock appears.
    pub stock_name: String,
    pub scores_by_date: BTreeMap<NaiveDate, f64>,
    pub streaks_by_date: BTreeMap<NaiveDate, u32>,
    /// Score at the most recent historical date, if the stock has one there.
    pub latest_score: Option<f64>,
}

impl StockRow {
    pub fn score_for(&self, column: &DateColumn) -> Option<f64> {
        match column {
            DateColumn::Historical(d) => self.scores_by_date.get(d).copied(),
            DateColumn::Future(_) => None,
        }
    }

    pub fn streak_for(&self, column: &DateColumn) -> Option<u32> {
        match column {
            DateColumn::Historical(d) => self.streaks_by_date.get(d).copied(),
            DateColumn::Future(_) => None,
        }
    }

    fn sort_key(&self) -> f64 {
        self.latest_score.unwrap_or(f64::NEG_INFINITY)
    }
}

fn compare(a: &StockRow, b: &StockRow, order: SortOrder) -> Ordering {
    let ord = a.sort_key().total_cmp(&b.sort_key());
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Stable in-place sort by latest score. Rows without one sort as −∞.
pub fn sort_rows(rows: &mut [StockRow], order: SortOrder) {
    rows.sort_by(|a, b| compare(a, b, order));
}

/// One row per stock seen on any date, sorted by latest score.
///
/// Ties keep encounter order: first date a stock appears, then stock id.
pub fn build_rows(history: &MomentumHistory, columns: &[DateColumn], order: SortOrder) -> Vec<StockRow> {
    let latest = history.latest_date();
    let mut rows: Vec<StockRow> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for record in history.records() {
        let slot = *index.entry(record.stock_id).or_insert_with(|| {
            rows.push(StockRow {
                stock_id: record.stock_id.to_string(),
                stock_name: record.stock_name.to_string(),
                scores_by_date: BTreeMap::new(),
                streaks_by_date: BTreeMap::new(),
                latest_score: None,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        // Records arrive in ascending date order, so the last name seen wins.
        row.stock_name = record.stock_name.to_string();
        if columns.contains(&DateColumn::Historical(record.date)) {
            row.scores_by_date.insert(record.date, record.momentum_percent);
            if let Some(days) = record.streak_days {
                row.streaks_by_date.insert(record.date, days);
            }
        }
        if Some(record.date) == latest {
            row.latest_score = Some(record.momentum_percent);
        }
    }

    sort_rows(&mut rows, order);
    rows
}
