//! Date grid: the ordered column set and the per-stock rows aligned to it.

pub mod columns;
pub mod rows;

pub use columns::{build_columns, next_weekdays, DateColumn};
pub use rows::{build_rows, sort_rows, SortOrder, StockRow};
