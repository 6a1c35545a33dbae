//! Table view model.
//!
//! `render` is a pure function of rows, columns, and options. The resulting
//! `TableView` owns the filter and the single selection; it is rebuilt
//! wholesale whenever its inputs change, and the controller carries the
//! query and selection across rebuilds.

pub mod bands;
pub mod export;

pub use bands::{ScoreBands, ScoreClass};

use crate::grid::{DateColumn, StockRow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub show_percent: bool,
    pub bands: ScoreBands,
}

/// Two decimals, optional percent sign.
pub fn format_score(score: f64, show_percent: bool) -> String {
    if show_percent {
        format!("{score:.2}%")
    } else {
        format!("{score:.2}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub label: String,
    pub future: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Formatted score, empty when the stock has no record for the date.
    pub text: String,
    /// Streak-days sub-label, e.g. `3d`.
    pub sub_label: Option<String>,
    pub class: Option<ScoreClass>,
    /// Future placeholder column; styled apart even when empty.
    pub future: bool,
}

impl TableCell {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub stock_id: String,
    pub stock_name: String,
    pub has_chart_data: bool,
    pub latest_score: Option<f64>,
    pub cells: Vec<TableCell>,
    pub visible: bool,
    pub selected: bool,
}

impl TableRow {
    fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.stock_name.to_lowercase().contains(needle_lower)
            || self.stock_id.to_lowercase().contains(needle_lower)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
    query: String,
}

/// Build the display grid. `has_chart` reports whether price data exists
/// for a stock id.
pub fn render(
    rows: &[StockRow],
    columns: &[DateColumn],
    options: &RenderOptions,
    has_chart: impl Fn(&str) -> bool,
) -> TableView {
    let headers = columns
        .iter()
        .map(|c| ColumnHeader {
            label: c.label(),
            future: c.is_future(),
        })
        .collect();

    let rows = rows
        .iter()
        .map(|row| TableRow {
            stock_id: row.stock_id.clone(),
            stock_name: row.stock_name.clone(),
            has_chart_data: has_chart(&row.stock_id),
            latest_score: row.latest_score,
            cells: columns
                .iter()
                .map(|col| {
                    let score = row.score_for(col);
                    TableCell {
                        text: score
                            .map(|s| format_score(s, options.show_percent))
                            .unwrap_or_default(),
                        sub_label: row.streak_for(col).map(|d| format!("{d}d")),
                        class: score.map(|s| options.bands.classify(s)),
                        future: col.is_future(),
                    }
                })
                .collect(),
            visible: true,
            selected: false,
        })
        .collect();

    TableView {
        headers,
        rows,
        query: String::new(),
    }
}

impl TableView {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hide rows whose name and code both miss a case-insensitive substring
    /// match. Scores are never searched.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        let needle = query.trim().to_lowercase();
        for row in &mut self.rows {
            row.visible = row.matches(&needle);
        }
    }

    /// Select one row, clearing every other selection first. Returns false
    /// (and leaves selection untouched) for an unknown id.
    pub fn select(&mut self, stock_id: &str) -> bool {
        if !self.rows.iter().any(|r| r.stock_id == stock_id) {
            return false;
        }
        for row in &mut self.rows {
            row.selected = row.stock_id == stock_id;
        }
        true
    }

    pub fn clear_selection(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
    }

    pub fn selected(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.selected)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> + '_ {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Index of a stock among the visible rows.
    pub fn position_of(&self, stock_id: &str) -> Option<usize> {
        self.visible_rows().position(|r| r.stock_id == stock_id)
    }

    pub fn visible_at(&self, index: usize) -> Option<&TableRow> {
        self.visible_rows().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MomentumEntry, MomentumHistory};
    use crate::grid::{build_columns, build_rows, SortOrder};
    use chrono::NaiveDate;

    fn sample_view() -> TableView {
        let mut h = MomentumHistory::new();
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        for (id, name, m, days) in [
            ("2330", "TSMC", 5.0, Some(3)),
            ("2317", "Hon Hai", -3.0, None),
            ("2454", "MediaTek", 1.25, None),
        ] {
            h.insert(
                d,
                id,
                MomentumEntry {
                    stock_name: name.into(),
                    momentum: m,
                    days,
                },
            );
        }
        let cols = build_columns(&h, 2);
        let rows = build_rows(&h, &cols, SortOrder::Desc);
        render(&rows, &cols, &RenderOptions::default(), |id| id == "2330")
    }

    #[test]
    fn cells_format_two_decimals_with_streak() {
        let view = sample_view();
        let tsmc = &view.rows[0];
        assert_eq!(tsmc.cells[0].text, "5.00");
        assert_eq!(tsmc.cells[0].sub_label.as_deref(), Some("3d"));
        assert_eq!(tsmc.cells[0].class, Some(ScoreClass::Level(2)));
        assert!(tsmc.has_chart_data);
        assert!(!view.rows[1].has_chart_data);
    }

    #[test]
    fn future_cells_are_empty_and_flagged() {
        let view = sample_view();
        assert_eq!(view.headers.len(), 3);
        assert!(view.headers[1].future && view.headers[2].future);
        for row in &view.rows {
            assert!(row.cells[1].is_empty() && row.cells[1].future);
            assert_eq!(row.cells[1].class, None);
        }
    }

    #[test]
    fn percent_option() {
        assert_eq!(format_score(-3.0, true), "-3.00%");
        assert_eq!(format_score(7.456, false), "7.46");
    }

    #[test]
    fn filter_matches_name_or_code_not_score() {
        let mut view = sample_view();
        view.apply_filter("media");
        assert_eq!(view.visible_count(), 1);
        view.apply_filter("23");
        assert_eq!(view.visible_count(), 2);
        view.apply_filter("5.00");
        assert_eq!(view.visible_count(), 0);
        view.apply_filter("");
        assert_eq!(view.visible_count(), 3);
    }

    #[test]
    fn selection_is_exclusive() {
        let mut view = sample_view();
        assert!(view.select("2330"));
        assert!(view.select("2317"));
        assert_eq!(view.rows.iter().filter(|r| r.selected).count(), 1);
        assert_eq!(view.selected().unwrap().stock_id, "2317");
        assert!(!view.select("0000"));
        assert_eq!(view.selected().unwrap().stock_id, "2317");
    }

    #[test]
    fn position_counts_only_visible_rows() {
        let mut view = sample_view();
        view.apply_filter("2");
        assert_eq!(view.position_of("2454"), Some(1));
        view.apply_filter("2454");
        assert_eq!(view.position_of("2454"), Some(0));
        assert_eq!(view.position_of("2330"), None);
    }

    #[test]
    fn render_is_idempotent() {
        assert_eq!(sample_view(), sample_view());
    }
}
