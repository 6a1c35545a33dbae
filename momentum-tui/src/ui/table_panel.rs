//! Momentum table area: busy indicator, load error panel, or the table.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, LoadPhase};
use crate::panels::MomentumTablePanel;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.phase {
        LoadPhase::Idle | LoadPhase::Loading => render_busy(f, area, app),
        LoadPhase::Error(message) => render_error(f, area, app, message),
        LoadPhase::Loaded => {
            let panel = MomentumTablePanel::new(&app.table, app.cursor, &app.theme)
                .column_offset(app.column_offset)
                .sort_order(app.ui.sort_order)
                .max_level(app.render_options().bands.max_level());
            f.render_widget(panel, area);
        }
    }
}

fn render_busy(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(false))
        .title(" Momentum ")
        .title_style(theme.title(false));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  ⟳ Loading momentum data...",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_error(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.negative))
        .title(" Momentum [Error] ")
        .title_style(Style::default().fg(theme.negative).add_modifier(Modifier::BOLD));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Failed to load momentum data",
            Style::default().fg(theme.negative).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("  {message}"), Style::default().fg(theme.text_secondary))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", theme.hint()),
            Span::styled("R", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(" to retry, ", theme.hint()),
            Span::styled("e", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(" for error history", theme.hint()),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
