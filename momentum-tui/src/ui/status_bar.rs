//! Bottom status bar: key hints, load state, last toast.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, LoadPhase, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    let (state, style) = match &app.phase {
        LoadPhase::Idle => ("idle", theme.hint()),
        LoadPhase::Loading => ("loading", Style::default().fg(theme.warning)),
        LoadPhase::Loaded => ("ready", Style::default().fg(theme.positive)),
        LoadPhase::Error(_) => ("error", Style::default().fg(theme.negative)),
    };
    spans.push(Span::styled(format!(" [{state}]"), style));

    spans.push(Span::styled(
        " j/k:Move Enter:Chart s:Sort /:Search R:Refresh e:Errors ?:Help q:Quit",
        theme.hint(),
    ));

    if let Some(toast) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match toast.level {
            StatusLevel::Info => Style::default().fg(theme.accent),
            StatusLevel::Warning => Style::default().fg(theme.warning),
            StatusLevel::Error => Style::default().fg(theme.negative),
        };
        spans.push(Span::styled(toast.message.as_str(), style));
    }

    let line = Line::from(spans);
    let para = Paragraph::new(line);
    f.render_widget(para, area);
}
