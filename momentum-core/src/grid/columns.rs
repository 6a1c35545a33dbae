//! Column set: historical dates plus synthesized future weekdays.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::MomentumHistory;

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateColumn {
    /// A date present in the history.
    Historical(NaiveDate),
    /// A planning placeholder after the latest date. Never holds data.
    Future(NaiveDate),
}

impl DateColumn {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateColumn::Historical(d) | DateColumn::Future(d) => *d,
        }
    }

    pub fn is_future(&self) -> bool {
        matches!(self, DateColumn::Future(_))
    }

    /// Short header label, e.g. `01-03`.
    pub fn label(&self) -> String {
        self.date().format("%m-%d").to_string()
    }
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The `count` weekdays strictly after `after`, ascending.
pub fn next_weekdays(after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = after;
    while out.len() < count {
        cursor += Duration::days(1);
        if is_weekday(cursor) {
            out.push(cursor);
        }
    }
    out
}

/// Historical columns ascending, then `future_count` future weekday columns.
///
/// An empty history yields no columns at all.
pub fn build_columns(history: &MomentumHistory, future_count: usize) -> Vec<DateColumn> {
    let Some(latest) = history.latest_date() else {
        return Vec::new();
    };

    let mut columns: Vec<DateColumn> = history.dates().map(DateColumn::Historical).collect();
    columns.extend(next_weekdays(latest, future_count).into_iter().map(DateColumn::Future));
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MomentumEntry;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn friday_skips_to_monday() {
        // 2024-01-05 is a Friday.
        let next = next_weekdays(d(2024, 1, 5), 3);
        assert_eq!(next, vec![d(2024, 1, 8), d(2024, 1, 9), d(2024, 1, 10)]);
    }

    #[test]
    fn saturday_latest_still_walks_forward() {
        let next = next_weekdays(d(2024, 1, 6), 1);
        assert_eq!(next, vec![d(2024, 1, 8)]);
    }

    #[test]
    fn empty_history_has_no_columns() {
        assert!(build_columns(&MomentumHistory::new(), 5).is_empty());
    }

    #[test]
    fn zero_future_count_keeps_only_history() {
        let mut h = MomentumHistory::new();
        h.insert(
            d(2024, 1, 2),
            "2330",
            MomentumEntry {
                stock_name: "TSMC".into(),
                momentum: 1.0,
                days: None,
            },
        );
        let cols = build_columns(&h, 0);
        assert_eq!(cols, vec![DateColumn::Historical(d(2024, 1, 2))]);
    }

    #[test]
    fn label_is_month_day() {
        assert_eq!(DateColumn::Future(d(2024, 1, 4)).label(), "01-04");
    }
}
