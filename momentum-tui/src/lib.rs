//! Momentum dashboard TUI
//!
//! Interactive terminal view over the momentum core:
//! - Sortable, filterable score table with future placeholder columns
//! - Slide-out K-line chart with volume, MACD and RSI panels
//! - Momentum trend chart from the history alone
//! - Background worker for every source fetch

pub mod app;
pub mod input;
pub mod panels;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
