//! Parrot/neon theme tokens for the momentum dashboard.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, headers)
//! - **Positive**: Neon green (strongest momentum band)
//! - **Negative**: Hot pink (negative momentum, errors)
//! - **Warning**: Neon orange (warnings, loading)
//! - **Neutral**: Cool purple (selection, middle bands)
//! - **Muted**: Steel blue (hints, future columns)

use ratatui::style::{Color, Modifier, Style};

use momentum_core::table::ScoreClass;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Slightly lifted surface for future placeholder cells
    pub surface: Color,
    /// Electric cyan accent (focus, highlights)
    pub accent: Color,
    /// Neon green
    pub positive: Color,
    /// Hot pink
    pub negative: Color,
    /// Neon orange
    pub warning: Color,
    /// Cool purple
    pub neutral: Color,
    /// Steel blue
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            surface: Color::Rgb(26, 26, 26),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Color for a score band. `max_level` is the strongest band.
    pub fn score_color(&self, class: ScoreClass, max_level: usize) -> Color {
        match class {
            ScoreClass::Negative => self.negative,
            ScoreClass::Level(0) => self.text_secondary,
            ScoreClass::Level(n) if n >= max_level => self.positive,
            ScoreClass::Level(n) if n * 2 > max_level => self.accent,
            ScoreClass::Level(_) => self.neutral,
        }
    }

    /// Resolve a figure color (`#rrggbb` or a CSS-ish name).
    pub fn series_color(&self, spec: &str) -> Color {
        match spec.trim().to_ascii_lowercase().as_str() {
            "grey" => Color::Gray,
            other => other.parse().unwrap_or(self.text_secondary),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn title(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused { self.accent } else { self.muted });
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn future_header(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn future_cell(&self) -> Style {
        Style::default().fg(self.muted).bg(self.surface)
    }
}
