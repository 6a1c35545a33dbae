//! Slide-out chart for the selected stock.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, ChartData, ChartView};
use crate::panels::FigurePanel;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let stock_id = app.ui.selected_stock_id.as_deref().unwrap_or("");
    let figure = app.current_figure();

    let title = match &figure {
        Some(Ok(fig)) => fig.layout.title.clone().unwrap_or_else(|| stock_id.to_string()),
        _ => stock_id.to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .title(format!(" {title} "))
        .title_style(theme.title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    render_controls(f, chunks[0], app);

    match figure {
        Some(Ok(fig)) => f.render_widget(FigurePanel::new(&fig, theme), chunks[1]),
        Some(Err(e)) => render_message(f, chunks[1], app, &e.to_string(), theme.warning),
        None => match &app.chart.data {
            ChartData::Pending => {
                render_message(f, chunks[1], app, &format!("Loading chart for {stock_id}..."), theme.warning)
            }
            ChartData::Failed(message) => {
                render_message(f, chunks[1], app, &format!("Chart failed: {message}"), theme.negative)
            }
            _ => render_message(f, chunks[1], app, "Select a stock and press Enter", theme.muted),
        },
    }
}

fn render_controls(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let on = |flag: bool| {
        if flag {
            Style::default().fg(theme.positive)
        } else {
            Style::default().fg(theme.muted)
        }
    };

    let mut spans = Vec::new();
    for (i, days) in app.config.chart.periods.iter().enumerate() {
        let style = if *days == app.ui.period_days {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            theme.hint()
        };
        spans.push(Span::styled(format!("{}:{}d", i + 1, days), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("| ", theme.hint()));
    spans.push(Span::styled("m:MACD ", on(app.ui.toggles.macd)));
    spans.push(Span::styled("r:RSI ", on(app.ui.toggles.rsi)));
    spans.push(Span::styled("v:Vol ", on(app.ui.show_volume)));
    spans.push(Span::styled("| ", theme.hint()));
    let view = match app.chart.view {
        ChartView::Price => "t:price",
        ChartView::Trend => "t:trend",
    };
    spans.push(Span::styled(view, Style::default().fg(theme.accent)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_message(f: &mut Frame, area: Rect, app: &AppState, message: &str, color: Color) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {message}"), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled("  c: hide chart  t: price/trend", app.theme.hint())),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
