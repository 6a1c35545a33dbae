//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels;
//! every response is applied through one of the `on_*` handlers so the load
//! and chart guards live in a single place.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use momentum_core::chart::{
    compose_price_figure, shape_momentum_trend, ChartOptions, Figure, IndicatorToggles, ShapeError,
};
use momentum_core::config::DashboardConfig;
use momentum_core::data::LoadedData;
use momentum_core::domain::StockPrices;
use momentum_core::grid::{build_columns, build_rows, sort_rows, DateColumn, SortOrder, StockRow};
use momentum_core::table::{render, RenderOptions, ScoreBands, TableRow, TableView};

use crate::theme::Theme;
use crate::worker::{ChartTicket, WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Load state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// User-facing choices, mutated only by `AppState`.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub selected_stock_id: Option<String>,
    pub sort_order: SortOrder,
    pub search_query: String,
    pub period_days: usize,
    pub toggles: IndicatorToggles,
    pub show_volume: bool,
}

impl UiState {
    fn from_config(config: &DashboardConfig) -> Self {
        let chart = ChartOptions::from_config(&config.chart);
        Self {
            selected_stock_id: None,
            sort_order: SortOrder::default(),
            search_query: String::new(),
            period_days: chart.period_days,
            toggles: chart.toggles,
            show_volume: chart.show_volume,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A transient status-bar notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: StatusLevel,
    pub expires_at: Instant,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Chart,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Chart => "CHART",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// What the chart panel plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartView {
    #[default]
    Price,
    Trend,
}

/// Chart data for the selected stock as last delivered by the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Empty,
    Pending,
    Ready(Box<StockPrices>),
    Missing,
    Failed(String),
}

/// Chart panel state.
#[derive(Debug, Clone)]
pub struct ChartPanelState {
    pub visible: bool,
    pub view: ChartView,
    pub data: ChartData,
    /// Ticket of the request whose result is on screen (or awaited).
    pub current: Option<ChartTicket>,
}

impl ChartPanelState {
    pub fn new() -> Self {
        Self {
            visible: true,
            view: ChartView::Price,
            data: ChartData::Empty,
            current: None,
        }
    }
}

impl Default for ChartPanelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
    Search,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub config: DashboardConfig,
    pub theme: Theme,

    pub ui: UiState,
    pub phase: LoadPhase,
    generation: u64,
    next_chart_seq: u64,

    // Loaded data and its derived views
    pub data: Option<LoadedData>,
    pub columns: Vec<DateColumn>,
    pub rows: Vec<StockRow>,
    pub table: TableView,
    render_options: RenderOptions,

    // Table navigation
    pub cursor: usize,
    /// Date columns hidden off the right edge; 0 keeps the latest in view.
    pub column_offset: usize,

    pub chart: ChartPanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<Toast>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    /// Query text before the search overlay was opened.
    pub search_backup: String,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let render_options = RenderOptions {
            show_percent: config.table.show_percent,
            bands: ScoreBands::new(config.table.score_thresholds.clone()),
        };
        Self {
            running: true,
            ui: UiState::from_config(&config),
            config,
            theme: Theme::default(),
            phase: LoadPhase::Idle,
            generation: 0,
            next_chart_seq: 0,
            data: None,
            columns: Vec::new(),
            rows: Vec::new(),
            table: TableView::default(),
            render_options,
            cursor: 0,
            column_offset: 0,
            chart: ChartPanelState::new(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            search_backup: String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    // ── Load lifecycle ───────────────────────────────────────────────

    /// Start (or restart) a load. A refresh issued while a load is in flight
    /// supersedes it; the older response is discarded on arrival.
    pub fn request_load(&mut self) {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        tracing::info!(generation = self.generation, "load requested");
        let cmd = WorkerCommand::Load {
            generation: self.generation,
        };
        if self.worker_tx.send(cmd).is_err() {
            self.fail_load("background worker is not running".into());
        }
    }

    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Loaded { generation, result } => self.on_load_finished(generation, result),
            WorkerResponse::ChartLoaded { ticket, result } => self.on_chart_loaded(ticket, result),
        }
    }

    pub fn on_load_finished(&mut self, generation: u64, result: Result<LoadedData, String>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale load");
            return;
        }
        match result {
            Ok(data) => {
                let warnings = data.warnings.clone();
                tracing::info!(
                    dates = data.history.date_count(),
                    stocks = data.history.stock_ids().len(),
                    "load finished"
                );
                self.data = Some(data);
                self.phase = LoadPhase::Loaded;
                self.rebuild_grid();
                let warning_count = warnings.len();
                for warning in warnings {
                    self.push_error(ErrorCategory::Data, warning, "loading data".into());
                }
                if warning_count > 0 {
                    self.set_warning(format!(
                        "Loaded {} stocks with {warning_count} warning(s), press e for details",
                        self.rows.len()
                    ));
                } else {
                    self.set_status(format!("Loaded {} stocks", self.rows.len()));
                }
                self.select_after_load();
            }
            Err(message) => self.fail_load(message),
        }
    }

    fn fail_load(&mut self, message: String) {
        self.phase = LoadPhase::Error(message.clone());
        self.data = None;
        self.columns.clear();
        self.rows.clear();
        self.table = TableView::default();
        self.chart.data = ChartData::Empty;
        self.chart.current = None;
        self.ui.selected_stock_id = None;
        self.push_error(ErrorCategory::Network, message, "loading momentum history".into());
    }

    /// Keep the previous selection when it survives a refresh, else pick
    /// the first visible row.
    fn select_after_load(&mut self) {
        let keep = self
            .ui
            .selected_stock_id
            .clone()
            .filter(|id| self.table.position_of(id).is_some());
        let target = keep.or_else(|| self.table.visible_at(0).map(|row| row.stock_id.clone()));
        match target {
            Some(id) => self.select_stock(&id),
            None => {
                self.ui.selected_stock_id = None;
                self.chart.data = ChartData::Empty;
                self.chart.current = None;
            }
        }
    }

    // ── Derived views ────────────────────────────────────────────────

    fn rebuild_grid(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        self.columns = build_columns(&data.history, self.config.grid.future_days);
        self.rows = build_rows(&data.history, &self.columns, self.ui.sort_order);
        self.column_offset = 0;
        self.rebuild_table();
    }

    fn rebuild_table(&mut self) {
        let data = self.data.as_ref();
        self.table = render(&self.rows, &self.columns, &self.render_options, |id| {
            data.is_some_and(|d| d.has_prices_for(id))
        });
        self.table.apply_filter(&self.ui.search_query);
        if let Some(id) = &self.ui.selected_stock_id {
            self.table.select(id);
        }
        self.sync_cursor();
    }

    /// Put the cursor on the selected row when visible, else clamp it.
    fn sync_cursor(&mut self) {
        let selected = self
            .ui
            .selected_stock_id
            .as_deref()
            .and_then(|id| self.table.position_of(id));
        self.cursor = match selected {
            Some(pos) => pos,
            None => self.cursor.min(self.table.visible_count().saturating_sub(1)),
        };
    }

    pub fn cursor_row(&self) -> Option<&TableRow> {
        self.table.visible_at(self.cursor)
    }

    // ── Table interactions ───────────────────────────────────────────

    pub fn toggle_sort(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.ui.sort_order = self.ui.sort_order.toggle();
        sort_rows(&mut self.rows, self.ui.sort_order);
        self.rebuild_table();
        self.set_status(format!("Sorted by latest score {}", self.ui.sort_order.arrow()));
    }

    pub fn set_search(&mut self, query: &str) {
        self.ui.search_query = query.to_string();
        self.table.apply_filter(query);
        self.sync_cursor();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.table.visible_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.table.visible_count().saturating_sub(1);
    }

    /// Shift the date window back (positive) or forward in time.
    pub fn scroll_columns(&mut self, delta: isize) {
        let max = self.columns.len().saturating_sub(1);
        self.column_offset = self.column_offset.saturating_add_signed(delta).min(max);
    }

    pub fn select_at_cursor(&mut self) {
        if let Some(id) = self.cursor_row().map(|row| row.stock_id.clone()) {
            self.select_stock(&id);
        }
    }

    /// Select a stock and request its chart. Inert unless loaded.
    pub fn select_stock(&mut self, stock_id: &str) {
        if !self.is_loaded() {
            return;
        }
        if !self.table.select(stock_id) {
            tracing::debug!(stock_id, "ignoring selection of unknown stock");
            return;
        }
        self.ui.selected_stock_id = Some(stock_id.to_string());
        self.sync_cursor();
        self.chart.visible = true;

        self.next_chart_seq += 1;
        let ticket = ChartTicket {
            stock_id: stock_id.to_string(),
            seq: self.next_chart_seq,
        };
        self.chart.current = Some(ticket.clone());
        self.chart.data = ChartData::Pending;
        tracing::debug!(stock_id, seq = ticket.seq, "chart requested");
        if self.worker_tx.send(WorkerCommand::LoadChart { ticket }).is_err() {
            self.chart.data = ChartData::Failed("background worker is not running".into());
        }
    }

    /// Apply a chart response if it still matches the selection.
    pub fn on_chart_loaded(&mut self, ticket: ChartTicket, result: Result<Option<StockPrices>, String>) {
        if matches!(self.phase, LoadPhase::Idle | LoadPhase::Error(_)) {
            tracing::debug!(stock_id = %ticket.stock_id, "dropping chart without loaded data");
            return;
        }
        if self.ui.selected_stock_id.as_deref() != Some(ticket.stock_id.as_str()) {
            tracing::debug!(stock_id = %ticket.stock_id, seq = ticket.seq, "dropping chart for deselected stock");
            return;
        }
        if self.chart.current.as_ref().is_some_and(|cur| ticket.seq < cur.seq) {
            tracing::debug!(stock_id = %ticket.stock_id, seq = ticket.seq, "dropping superseded chart");
            return;
        }
        self.chart.data = match result {
            Ok(Some(prices)) => ChartData::Ready(Box::new(prices)),
            Ok(None) => ChartData::Missing,
            Err(message) => {
                self.push_error(ErrorCategory::Chart, message.clone(), format!("chart for {}", ticket.stock_id));
                ChartData::Failed(message)
            }
        };
        self.chart.current = Some(ticket);
    }

    // ── Chart interactions ───────────────────────────────────────────

    /// Switch to the n-th configured look-back preset.
    pub fn set_period(&mut self, index: usize) {
        if let Some(&days) = self.config.chart.periods.get(index) {
            self.ui.period_days = days;
            self.set_status(format!("Period: {days} days"));
        }
    }

    pub fn toggle_macd(&mut self) {
        self.ui.toggles.macd = !self.ui.toggles.macd;
        self.set_status(format!("MACD {}", on_off(self.ui.toggles.macd)));
    }

    pub fn toggle_rsi(&mut self) {
        self.ui.toggles.rsi = !self.ui.toggles.rsi;
        self.set_status(format!("RSI {}", on_off(self.ui.toggles.rsi)));
    }

    pub fn toggle_volume(&mut self) {
        self.ui.show_volume = !self.ui.show_volume;
        self.set_status(format!("Volume {}", on_off(self.ui.show_volume)));
    }

    pub fn toggle_chart_view(&mut self) {
        self.chart.view = match self.chart.view {
            ChartView::Price => ChartView::Trend,
            ChartView::Trend => ChartView::Price,
        };
    }

    pub fn toggle_chart_panel(&mut self) {
        self.chart.visible = !self.chart.visible;
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            period_days: self.ui.period_days,
            toggles: self.ui.toggles,
            show_volume: self.ui.show_volume,
            kline_share: self.config.chart.kline_share,
        }
    }

    /// Shape the figure for the selected stock from the current state.
    /// `None` while nothing is selected or price data is not in hand.
    pub fn current_figure(&self) -> Option<Result<Figure, ShapeError>> {
        let stock_id = self.ui.selected_stock_id.as_deref()?;
        match self.chart.view {
            ChartView::Trend => {
                let history = &self.data.as_ref()?.history;
                Some(shape_momentum_trend(history, stock_id))
            }
            ChartView::Price => match &self.chart.data {
                ChartData::Ready(prices) => {
                    Some(compose_price_figure(stock_id, Some(prices.as_ref()), &self.chart_options()))
                }
                ChartData::Missing => Some(compose_price_figure(stock_id, None, &self.chart_options())),
                _ => None,
            },
        }
    }

    // ── Notifications ────────────────────────────────────────────────

    fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.config.ui.toast_secs)
    }

    fn toast(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some(Toast {
            message,
            level,
            expires_at: Instant::now() + self.toast_duration(),
        });
    }

    /// Drop the toast once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self.status_message.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.status_message = None;
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %message, %context, "error recorded");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.toast(message, StatusLevel::Error);
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.toast(msg.into(), StatusLevel::Info);
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.toast(msg.into(), StatusLevel::Warning);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::test_helpers::{loaded_data, stock_prices};

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        (AppState::new(DashboardConfig::default(), cmd_tx, resp_rx), cmd_rx)
    }

    fn loaded_app() -> (AppState, Receiver<WorkerCommand>) {
        let (mut app, rx) = app();
        app.request_load();
        app.on_load_finished(1, Ok(loaded_data()));
        (app, rx)
    }

    fn drain(rx: &Receiver<WorkerCommand>) -> Vec<WorkerCommand> {
        rx.try_iter().collect()
    }

    fn chart_tickets(rx: &Receiver<WorkerCommand>) -> Vec<ChartTicket> {
        drain(rx)
            .into_iter()
            .filter_map(|cmd| match cmd {
                WorkerCommand::LoadChart { ticket } => Some(ticket),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_idle() {
        let (app, _rx) = app();
        assert_eq!(app.phase, LoadPhase::Idle);
        assert_eq!(app.ui.period_days, 90);
        assert_eq!(app.ui.sort_order, SortOrder::Desc);
    }

    #[test]
    fn load_success_builds_table_and_selects_first_row() {
        let (mut app, rx) = app();
        app.request_load();
        assert!(app.is_loading());
        assert!(matches!(drain(&rx)[..], [WorkerCommand::Load { generation: 1 }]));

        app.on_load_finished(1, Ok(loaded_data()));
        assert_eq!(app.phase, LoadPhase::Loaded);
        assert_eq!(app.rows.len(), 3);
        assert_eq!(app.columns.iter().filter(|c| c.is_future()).count(), 5);
        // highest latest score first
        assert_eq!(app.ui.selected_stock_id.as_deref(), Some("2330"));
        assert_eq!(app.chart.data, ChartData::Pending);
        let tickets = chart_tickets(&rx);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].stock_id, "2330");
    }

    #[test]
    fn load_failure_enters_error_and_retry_reloads() {
        let (mut app, rx) = app();
        app.request_load();
        app.on_load_finished(1, Err("connection refused".into()));
        assert_eq!(app.phase, LoadPhase::Error("connection refused".into()));
        assert!(app.table.rows.is_empty());
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.error_history[0].category, ErrorCategory::Network);

        app.request_load();
        assert!(app.is_loading());
        let cmds = drain(&rx);
        assert!(matches!(cmds.last(), Some(WorkerCommand::Load { generation: 2 })));
    }

    #[test]
    fn stale_load_is_discarded() {
        let (mut app, _rx) = app();
        app.request_load();
        app.request_load();
        app.on_load_finished(1, Err("old failure".into()));
        assert!(app.is_loading());
        app.on_load_finished(2, Ok(loaded_data()));
        assert!(app.is_loaded());
    }

    #[test]
    fn price_warnings_land_in_error_history() {
        let (mut app, _rx) = app();
        app.request_load();
        let mut data = loaded_data();
        data.warnings.push("price data unavailable: timeout".into());
        app.on_load_finished(1, Ok(data));
        assert!(app.is_loaded());
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.error_history[0].category, ErrorCategory::Data);
        let toast = app.status_message.as_ref().unwrap();
        assert_eq!(toast.level, StatusLevel::Warning);
        assert!(toast.message.contains("1 warning"));
    }

    #[test]
    fn clean_load_shows_info_toast() {
        let (app, _rx) = loaded_app();
        let toast = app.status_message.as_ref().unwrap();
        assert_eq!(toast.level, StatusLevel::Info);
        assert!(toast.message.contains("Loaded 3 stocks"));
    }

    #[test]
    fn chart_arriving_after_failed_refresh_is_dropped() {
        let (mut app, rx) = loaded_app();
        let ticket = chart_tickets(&rx).pop().unwrap();

        app.request_load();
        app.on_load_finished(2, Err("HTTP 500".into()));
        assert!(app.ui.selected_stock_id.is_none());

        app.on_chart_loaded(ticket, Ok(Some(stock_prices("TSMC"))));
        assert!(matches!(app.chart.data, ChartData::Empty));
        assert!(app.current_figure().is_none());
    }

    #[test]
    fn sort_and_select_are_inert_while_loading() {
        let (mut app, rx) = loaded_app();
        drain(&rx);
        app.request_load();

        app.toggle_sort();
        assert_eq!(app.ui.sort_order, SortOrder::Desc);
        app.select_stock("2317");
        assert_eq!(app.ui.selected_stock_id.as_deref(), Some("2330"));
        assert!(chart_tickets(&rx).is_empty());
    }

    #[test]
    fn refresh_keeps_surviving_selection() {
        let (mut app, rx) = loaded_app();
        app.select_stock("2317");
        drain(&rx);

        app.request_load();
        app.on_load_finished(2, Ok(loaded_data()));
        assert_eq!(app.ui.selected_stock_id.as_deref(), Some("2317"));
        assert_eq!(chart_tickets(&rx)[0].stock_id, "2317");
    }

    #[test]
    fn toggle_sort_reverses_rows_and_follows_selection() {
        let (mut app, _rx) = loaded_app();
        let before: Vec<_> = app.table.rows.iter().map(|r| r.stock_id.clone()).collect();
        app.toggle_sort();
        let after: Vec<_> = app.table.rows.iter().map(|r| r.stock_id.clone()).collect();
        assert_eq!(app.ui.sort_order, SortOrder::Asc);
        assert_eq!(after, before.into_iter().rev().collect::<Vec<_>>());
        assert_eq!(app.cursor_row().unwrap().stock_id, "2330");
    }

    #[test]
    fn search_filters_and_clamps_cursor() {
        let (mut app, _rx) = loaded_app();
        app.cursor_to_bottom();
        app.set_search("hon");
        assert_eq!(app.table.visible_count(), 1);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.cursor_row().unwrap().stock_id, "2317");
        app.set_search("");
        assert_eq!(app.table.visible_count(), 3);
    }

    #[test]
    fn filter_survives_refresh() {
        let (mut app, _rx) = loaded_app();
        app.set_search("2454");
        app.request_load();
        app.on_load_finished(2, Ok(loaded_data()));
        assert_eq!(app.table.query(), "2454");
        assert_eq!(app.table.visible_count(), 1);
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let (mut app, _rx) = loaded_app();
        app.move_cursor(-5);
        assert_eq!(app.cursor, 0);
        app.move_cursor(10);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn last_selection_wins_when_earlier_chart_arrives_late() {
        let (mut app, rx) = loaded_app();
        app.select_stock("2317");
        app.select_stock("2454");
        let tickets = chart_tickets(&rx);
        let a = tickets.iter().find(|t| t.stock_id == "2317").unwrap().clone();
        let b = tickets.iter().find(|t| t.stock_id == "2454").unwrap().clone();

        app.on_chart_loaded(a, Ok(Some(stock_prices("Hon Hai"))));
        assert_eq!(app.chart.data, ChartData::Pending);

        app.on_chart_loaded(b, Ok(Some(stock_prices("MediaTek"))));
        match &app.chart.data {
            ChartData::Ready(p) => assert_eq!(p.name.as_deref(), Some("MediaTek")),
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn reselecting_same_stock_drops_older_ticket() {
        let (mut app, rx) = loaded_app();
        app.select_stock("2317");
        app.select_stock("2317");
        let tickets = chart_tickets(&rx);
        let (old, new) = (tickets[tickets.len() - 2].clone(), tickets[tickets.len() - 1].clone());

        app.on_chart_loaded(new, Ok(Some(stock_prices("new"))));
        app.on_chart_loaded(old, Ok(Some(stock_prices("old"))));
        match &app.chart.data {
            ChartData::Ready(p) => assert_eq!(p.name.as_deref(), Some("new")),
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn missing_prices_shape_to_no_data_error() {
        let (mut app, rx) = loaded_app();
        let ticket = chart_tickets(&rx).remove(0);
        app.on_chart_loaded(ticket, Ok(None));
        assert_eq!(app.chart.data, ChartData::Missing);
        assert!(matches!(
            app.current_figure(),
            Some(Err(ShapeError::NoDataForStock { .. }))
        ));
    }

    #[test]
    fn chart_failure_is_recorded() {
        let (mut app, rx) = loaded_app();
        let ticket = chart_tickets(&rx).remove(0);
        app.on_chart_loaded(ticket, Err("timeout".into()));
        assert_eq!(app.chart.data, ChartData::Failed("timeout".into()));
        assert_eq!(app.error_history[0].category, ErrorCategory::Chart);
    }

    #[test]
    fn figure_follows_toggles_and_period() {
        let (mut app, rx) = loaded_app();
        let ticket = chart_tickets(&rx).remove(0);
        app.on_chart_loaded(ticket, Ok(Some(stock_prices("TSMC"))));

        let full = app.current_figure().unwrap().unwrap();
        assert_eq!(full.layout.panels().len(), 3);

        app.toggle_macd();
        app.toggle_rsi();
        let bare = app.current_figure().unwrap().unwrap();
        assert_eq!(bare.layout.panels().len(), 1);

        app.set_period(0);
        assert_eq!(app.ui.period_days, 30);
        let short = app.current_figure().unwrap().unwrap();
        assert_eq!(short.data[0].len(), 30);
    }

    #[test]
    fn trend_view_needs_only_history() {
        let (mut app, _rx) = loaded_app();
        app.toggle_chart_view();
        let fig = app.current_figure().unwrap().unwrap();
        assert_eq!(fig.data[0].name, "Momentum");
    }

    #[test]
    fn unknown_period_index_is_ignored() {
        let (mut app, _rx) = app();
        app.set_period(9);
        assert_eq!(app.ui.period_days, 90);
    }

    #[test]
    fn toast_expires() {
        let (mut app, _rx) = app();
        app.set_status("hello");
        let expires = app.status_message.as_ref().unwrap().expires_at;
        app.tick(expires - Duration::from_millis(1));
        assert!(app.status_message.is_some());
        app.tick(expires);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _rx) = app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
        assert_eq!(app.status_message.as_ref().unwrap().level, StatusLevel::Error);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Move(isize),
            Search(&'static str),
            Sort,
            Select,
            Bottom,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (-5isize..5).prop_map(Op::Move),
                prop::sample::select(vec!["", "2", "TSMC", "hon", "zzz", "0"]).prop_map(Op::Search),
                Just(Op::Sort),
                Just(Op::Select),
                Just(Op::Bottom),
            ]
        }

        proptest! {
            #[test]
            fn cursor_stays_on_a_visible_row(ops in prop::collection::vec(op(), 1..40)) {
                let (mut app, _rx) = loaded_app();
                for op in ops {
                    match op {
                        Op::Move(d) => app.move_cursor(d),
                        Op::Search(q) => app.set_search(q),
                        Op::Sort => app.toggle_sort(),
                        Op::Select => app.select_at_cursor(),
                        Op::Bottom => app.cursor_to_bottom(),
                    }
                    let count = app.table.visible_count();
                    if count == 0 {
                        prop_assert!(app.cursor_row().is_none());
                    } else {
                        prop_assert!(app.cursor < count);
                        prop_assert!(app.cursor_row().is_some());
                    }
                }
            }
        }
    }
}
