//! Momentum table panel - one row per stock, one column per date
//!
//! Displays:
//! - Chart-data marker and selection arrow
//! - Stock code and name
//! - Score per date, colored by band, with the streak sub-label
//! - Future placeholder columns, dimmed

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use momentum_core::grid::SortOrder;
use momentum_core::table::{TableCell, TableView};

use crate::theme::Theme;

const MARK_WIDTH: u16 = 3;
const CODE_WIDTH: u16 = 6;
const NAME_WIDTH: u16 = 10;
const DATE_WIDTH: u16 = 11;
const SPACING: u16 = 1;

/// Momentum table widget
pub struct MomentumTablePanel<'a> {
    view: &'a TableView,
    cursor: usize,
    column_offset: usize,
    sort_order: SortOrder,
    max_level: usize,
    theme: &'a Theme,
}

impl<'a> MomentumTablePanel<'a> {
    pub fn new(view: &'a TableView, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            view,
            cursor,
            column_offset: 0,
            sort_order: SortOrder::default(),
            max_level: 2,
            theme,
        }
    }

    pub fn column_offset(mut self, offset: usize) -> Self {
        self.column_offset = offset;
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Date-column range that fits `width`, anchored at the right edge
    /// minus `column_offset`.
    fn date_window(&self, width: u16) -> (usize, usize) {
        let fixed = MARK_WIDTH + CODE_WIDTH + NAME_WIDTH + 3 * SPACING;
        let fit = (width.saturating_sub(fixed) / (DATE_WIDTH + SPACING)) as usize;
        let total = self.view.headers.len();
        let end = total.saturating_sub(self.column_offset.min(total.saturating_sub(1)));
        let start = end.saturating_sub(fit.max(1));
        (start, end)
    }

    fn score_cell(&self, cell: &TableCell) -> Cell<'a> {
        if cell.future {
            return Cell::from(Span::styled("·", self.theme.future_cell())).style(self.theme.future_cell());
        }
        if cell.is_empty() {
            return Cell::from(Span::styled("-", Style::default().fg(self.theme.muted)));
        }
        let color = cell
            .class
            .map(|class| self.theme.score_color(class, self.max_level))
            .unwrap_or(self.theme.text_primary);
        let mut spans = vec![Span::styled(format!("{:>7}", cell.text), Style::default().fg(color))];
        if let Some(sub) = &cell.sub_label {
            spans.push(Span::styled(format!(" {sub}"), Style::default().fg(self.theme.muted)));
        }
        Cell::from(Line::from(spans))
    }

    /// First visible row index so that the cursor stays on screen.
    fn scroll_start(&self, body_height: usize) -> usize {
        if body_height == 0 {
            return 0;
        }
        self.cursor.saturating_sub(body_height - 1)
    }
}

impl<'a> Widget for MomentumTablePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.view.visible_count();
        let mut title = format!(
            " Momentum [latest {}] {}/{} stocks ",
            self.sort_order.arrow(),
            visible,
            self.view.rows.len(),
        );
        if !self.view.query().is_empty() {
            title.push_str(&format!("filter: \"{}\" ", self.view.query()));
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);

        let (start, end) = self.date_window(inner.width);
        let header_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);

        let mut header_cells = vec![
            Cell::from(""),
            Cell::from("Code").style(header_style),
            Cell::from("Name").style(header_style),
        ];
        for header in &self.view.headers[start..end] {
            let style = if header.future {
                self.theme.future_header()
            } else {
                header_style
            };
            header_cells.push(Cell::from(format!("{:>7}", header.label)).style(style));
        }
        let header = Row::new(header_cells).height(1);

        let body_height = inner.height.saturating_sub(1) as usize;
        let skip = self.scroll_start(body_height);
        let rows = self
            .view
            .visible_rows()
            .enumerate()
            .skip(skip)
            .take(body_height)
            .map(|(i, row)| {
                let style = if i == self.cursor {
                    Style::default()
                        .bg(self.theme.neutral)
                        .fg(self.theme.text_primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.text_primary)
                };
                let marker = match (row.selected, row.has_chart_data) {
                    (true, true) => "▶●",
                    (true, false) => "▶○",
                    (false, true) => " ●",
                    (false, false) => " ○",
                };
                let mut cells = vec![
                    Cell::from(marker).style(Style::default().fg(self.theme.accent)),
                    Cell::from(row.stock_id.clone()),
                    Cell::from(row.stock_name.chars().take(NAME_WIDTH as usize).collect::<String>()),
                ];
                cells.extend(row.cells[start..end].iter().map(|c| self.score_cell(c)));
                Row::new(cells).style(style).height(1)
            });

        let mut widths = vec![
            Constraint::Length(MARK_WIDTH),
            Constraint::Length(CODE_WIDTH),
            Constraint::Length(NAME_WIDTH),
        ];
        widths.extend(std::iter::repeat(Constraint::Length(DATE_WIDTH)).take(end - start));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(SPACING);
        table.render(area, buf);

        if start > 0 && inner.width > 0 {
            buf.set_string(inner.x, inner.y, "◀", Style::default().fg(self.theme.muted));
        }
        if visible == 0 && inner.height > 2 {
            let msg = if self.view.rows.is_empty() {
                "No momentum data"
            } else {
                "No stocks match the filter"
            };
            buf.set_string(inner.x + 2, inner.y + 2, msg, Style::default().fg(self.theme.muted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentum_core::grid::{build_columns, build_rows};
    use momentum_core::table::{render, RenderOptions};

    use crate::test_helpers::history;

    fn view() -> TableView {
        let h = history();
        let cols = build_columns(&h, 2);
        let rows = build_rows(&h, &cols, SortOrder::Desc);
        render(&rows, &cols, &RenderOptions::default(), |id| id == "2330")
    }

    fn content(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        content
    }

    #[test]
    fn test_table_renders_rows_and_headers() {
        let theme = Theme::default();
        let view = view();
        let area = Rect::new(0, 0, 100, 10);
        let mut buf = Buffer::empty(area);
        MomentumTablePanel::new(&view, 0, &theme).render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("TSMC"));
        assert!(text.contains("Hon Hai"));
        assert!(text.contains("01-03"));
        assert!(text.contains("01-05"));
        assert!(text.contains("7.50 3d"));
        assert!(text.contains("3/3 stocks"));
    }

    #[test]
    fn test_narrow_table_keeps_latest_columns() {
        let theme = Theme::default();
        let view = view();
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        MomentumTablePanel::new(&view, 0, &theme).render(area, &mut buf);

        let text = content(&buf, area);
        // two future columns (01-04, 01-05) are rightmost; only one date fits
        assert!(text.contains("01-05"));
        assert!(!text.contains("01-02"));
        assert!(text.contains("◀"));
    }

    #[test]
    fn test_column_offset_scrolls_back_in_time() {
        let theme = Theme::default();
        let view = view();
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        MomentumTablePanel::new(&view, 0, &theme)
            .column_offset(3)
            .render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("01-02"));
        assert!(!text.contains("01-05"));
    }

    #[test]
    fn test_cursor_row_highlighted() {
        let theme = Theme::default();
        let view = view();
        let area = Rect::new(0, 0, 100, 10);
        let mut buf = Buffer::empty(area);
        MomentumTablePanel::new(&view, 1, &theme).render(area, &mut buf);

        // border, header, row 0, row 1
        let cell = buf.cell((2, 3)).unwrap();
        assert_eq!(cell.bg, theme.neutral);
    }

    #[test]
    fn test_empty_filter_message() {
        let theme = Theme::default();
        let mut view = view();
        view.apply_filter("zzz");
        let area = Rect::new(0, 0, 100, 10);
        let mut buf = Buffer::empty(area);
        MomentumTablePanel::new(&view, 0, &theme).render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("No stocks match the filter"));
        assert!(text.contains("0/3 stocks"));
    }
}
