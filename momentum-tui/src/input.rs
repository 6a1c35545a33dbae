//! Keyboard input dispatch: overlays → global keys → table/chart keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, LoadPhase, Overlay};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('R') | KeyCode::F(5) => {
            app.request_load();
            return;
        }
        KeyCode::Enter if matches!(app.phase, LoadPhase::Error(_)) => {
            app.request_load();
            return;
        }
        _ => {}
    }

    // 3. Table and chart keys.
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_bottom(),
        KeyCode::Char('h') | KeyCode::Left => app.scroll_columns(1),
        KeyCode::Char('l') | KeyCode::Right => app.scroll_columns(-1),
        KeyCode::Enter => app.select_at_cursor(),
        KeyCode::Char('s') => app.toggle_sort(),
        KeyCode::Char('/') => {
            app.search_backup = app.ui.search_query.clone();
            app.overlay = Overlay::Search;
        }
        KeyCode::Esc if !app.ui.search_query.is_empty() => app.set_search(""),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.set_period(index);
        }
        KeyCode::Char('m') => app.toggle_macd(),
        KeyCode::Char('r') => app.toggle_rsi(),
        KeyCode::Char('v') => app.toggle_volume(),
        KeyCode::Char('t') => app.toggle_chart_view(),
        KeyCode::Char('c') => app.toggle_chart_panel(),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// The filter follows every keystroke; Esc restores the previous query.
fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let previous = std::mem::take(&mut app.search_backup);
            app.set_search(&previous);
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            app.search_backup.clear();
            app.overlay = Overlay::None;
            app.select_at_cursor();
        }
        KeyCode::Backspace => {
            let mut query = app.ui.search_query.clone();
            query.pop();
            app.set_search(&query);
        }
        KeyCode::Char(c) => {
            let mut query = app.ui.search_query.clone();
            query.push(c);
            app.set_search(&query);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    use crossterm::event::{KeyEventState, KeyModifiers};
    use momentum_core::config::DashboardConfig;
    use momentum_core::grid::SortOrder;

    use crate::test_helpers::loaded_data;
    use crate::worker::WorkerCommand;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let mut app = AppState::new(DashboardConfig::default(), cmd_tx, resp_rx);
        app.request_load();
        app.on_load_finished(1, Ok(loaded_data()));
        (app, cmd_rx)
    }

    fn type_str(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = loaded_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn q_quits() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn s_toggles_sort() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('s')));
        assert_eq!(app.ui.sort_order, SortOrder::Asc);
    }

    #[test]
    fn j_then_enter_selects_second_row() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.ui.selected_stock_id.as_deref(), Some("2454"));
    }

    #[test]
    fn search_filters_live_and_escape_restores() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.overlay, Overlay::Search);

        type_str(&mut app, "ts");
        assert_eq!(app.table.visible_count(), 1);
        // keys are text while searching
        assert!(app.running);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.table.visible_count(), 3);
    }

    #[test]
    fn search_enter_keeps_query_and_selects() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        type_str(&mut app, "hon");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.ui.search_query, "hon");
        assert_eq!(app.ui.selected_stock_id.as_deref(), Some("2317"));

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.ui.search_query, "");
    }

    #[test]
    fn number_keys_pick_period_presets() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.ui.period_days, 60);
        handle_key(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.ui.period_days, 60);
    }

    #[test]
    fn indicator_and_panel_toggles() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('m')));
        handle_key(&mut app, press(KeyCode::Char('r')));
        handle_key(&mut app, press(KeyCode::Char('v')));
        handle_key(&mut app, press(KeyCode::Char('c')));
        assert!(!app.ui.toggles.macd);
        assert!(!app.ui.toggles.rsi);
        assert!(app.ui.show_volume);
        assert!(!app.chart.visible);
    }

    #[test]
    fn shift_r_refreshes() {
        let (mut app, rx) = loaded_app();
        rx.try_iter().count();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
        assert!(app.is_loading());
        assert!(matches!(rx.try_recv(), Ok(WorkerCommand::Load { generation: 2 })));
    }

    #[test]
    fn enter_retries_after_failure() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let mut app = AppState::new(DashboardConfig::default(), cmd_tx, resp_rx);
        app.request_load();
        app.on_load_finished(1, Err("boom".into()));
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.is_loading());
        assert_eq!(cmd_rx.try_iter().count(), 2);
    }

    #[test]
    fn help_overlay_closes_on_any_key() {
        let (mut app, _rx) = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.overlay, Overlay::Help);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn error_overlay_scroll_is_bounded() {
        let (mut app, _rx) = loaded_app();
        app.push_error(crate::app::ErrorCategory::Other, "a".into(), String::new());
        app.push_error(crate::app::ErrorCategory::Other, "b".into(), String::new());
        handle_key(&mut app, press(KeyCode::Char('e')));
        for _ in 0..5 {
            handle_key(&mut app, press(KeyCode::Char('j')));
        }
        assert_eq!(app.error_scroll, 1);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }
}
