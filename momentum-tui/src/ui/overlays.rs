//! Overlay widgets: help, error history, search.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::ui::centered_rect;

const KEYS: &[(&str, &str)] = &[
    ("j / k", "move cursor"),
    ("g / G", "first / last row"),
    ("h / l", "scroll dates back / forward"),
    ("Enter", "select stock and open chart"),
    ("s", "toggle sort by latest score"),
    ("/", "search by name or code (Esc clears)"),
    ("1..9", "chart period preset"),
    ("m / r / v", "toggle MACD / RSI / volume"),
    ("t", "price or momentum trend chart"),
    ("c", "show / hide chart panel"),
    ("R / F5", "refresh (retry after an error)"),
    ("e", "error history"),
    ("q", "quit"),
];

/// Key binding reference.
pub fn render_help(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Keys [any key] close ")
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let mut lines = vec![Line::from("")];
    for (key, action) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<10}"), Style::default().fg(theme.accent)),
            Span::styled(*action, Style::default().fg(theme.text_secondary)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  ●", Style::default().fg(theme.accent)),
        Span::styled(" price data available  ", theme.hint()),
        Span::styled("○", Style::default().fg(theme.accent)),
        Span::styled(" momentum only", theme.hint()),
    ]));

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let negative = Style::default().fg(theme.negative);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(negative)
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(negative);

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme.hint()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.range(start..end).enumerate() {
        let style = if i == 0 {
            negative.add_modifier(Modifier::BOLD)
        } else {
            theme.hint()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme.hint()),
            Span::styled(format!("[{}] ", err.category.label()), Style::default().fg(theme.warning)),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme.hint()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Live filter input.
pub fn render_search(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let accent = Style::default().fg(theme.accent);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(accent)
        .title(" Search [Enter]keep [Esc]cancel ")
        .title_style(accent.add_modifier(Modifier::BOLD));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(Span::styled(
            format!("Name or code: {} match", app.table.visible_count()),
            theme.hint(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", accent),
            Span::styled(app.ui.search_query.as_str(), accent.add_modifier(Modifier::BOLD)),
            Span::styled("_", accent),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}
