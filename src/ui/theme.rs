//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::mapper::Rgb;

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn body_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn track_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn value_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn warning_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::LightRed)
    }

    /// Terminal colour for a mapped gradient colour.
    pub fn rgb(c: Rgb) -> Color {
        Color::Rgb(c.0, c.1, c.2)
    }
}
