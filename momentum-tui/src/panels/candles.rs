//! Candle panel - OHLC candle rendering for a K-line trace
//!
//! Renders candlesticks using direct buffer writes:
//! - Each candle = 1 terminal column, latest candles kept when space runs out
//! - Body: block char in the trace's increasing/decreasing color
//! - Wicks: vertical line chars to high/low

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use momentum_core::chart::Trace;

use crate::theme::Theme;

/// OHLC bar for candle rendering
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Bars from a candlestick trace. Days with a missing value are dropped.
pub fn bars_from_trace(trace: &Trace) -> Vec<OhlcBar> {
    let (Some(open), Some(high), Some(low), Some(close)) = (&trace.open, &trace.high, &trace.low, &trace.close)
    else {
        return Vec::new();
    };
    open.iter()
        .zip(high)
        .zip(low)
        .zip(close)
        .map(|(((&open, &high), &low), &close)| OhlcBar { open, high, low, close })
        .filter(OhlcBar::is_finite)
        .collect()
}

/// Candle panel widget
pub struct CandlePanel<'a> {
    bars: &'a [OhlcBar],
    title: &'a str,
    up: Color,
    down: Color,
    theme: &'a Theme,
}

impl<'a> CandlePanel<'a> {
    pub fn new(bars: &'a [OhlcBar], title: &'a str, theme: &'a Theme) -> Self {
        Self {
            bars,
            title,
            up: theme.positive,
            down: theme.negative,
            theme,
        }
    }

    /// Take body colors from the trace's increasing/decreasing styles.
    pub fn colors_from(mut self, trace: &Trace) -> Self {
        if let Some(inc) = &trace.increasing {
            self.up = self.theme.series_color(&inc.line.color);
        }
        if let Some(dec) = &trace.decreasing {
            self.down = self.theme.series_color(&dec.line.color);
        }
        self
    }

    /// Map a price to a Y position in the plot area (0 = top)
    fn price_to_y(&self, price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
    }
}

impl<'a> Widget for CandlePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bars.is_empty() {
            let block = Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }

        let y_min = self.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let y_max = self.bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

        // Add padding
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let up_count = self.bars.iter().filter(|b| b.close >= b.open).count();
        let down_count = self.bars.len() - up_count;

        let title = format!(
            " {} | {} bars | {} up {} down ",
            self.title,
            self.bars.len(),
            up_count,
            down_count,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Reserve left margin for Y-axis labels (8 chars)
        let label_width: u16 = 8;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let plot_height = inner.height;

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (label_val, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            let label = format!("{:>7.1}", label_val);
            buf.set_string(inner.x, plot_top + y_pos, &label, Style::default().fg(self.theme.muted));
        }

        let start_bar = self.bars.len().saturating_sub(plot_width as usize);
        for (i, bar) in self.bars[start_bar..].iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= inner.right() {
                break;
            }

            let is_up = bar.close >= bar.open;
            let style = Style::default().fg(if is_up { self.up } else { self.down });

            let high_y = self.price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = self.price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top_y = self.price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot_y = self.price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "|", style);
            }

            let body_char = if is_up { "\u{2588}" } else { "\u{2593}" }; // full block vs medium shade
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }

            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
        }
    }
}
