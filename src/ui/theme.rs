//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

const BRAND_ORANGE: Color = Color::Rgb(0xff, 0x62, 0x31);
const DISCOUNT_RED: Color = Color::Rgb(0xf8, 0x32, 0x3e);
const MUTED: Color = Color::Rgb(0xbc, 0xbd, 0xc3);
const SHOW_ALL: Color = Color::Rgb(0x9c, 0x9d, 0xa4);

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn title_text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn price_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn struck_price_style() -> Style {
        Style::default()
            .fg(MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn rate_style() -> Style {
        Style::default()
            .fg(DISCOUNT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(MUTED)
    }

    pub fn upcoming_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn countdown_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(DISCOUNT_RED)
    }

    pub fn stock_filled_style() -> Style {
        Style::default().fg(DISCOUNT_RED)
    }

    pub fn stock_empty_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── strips ─────────────────────────────────────────────────
    pub fn lure_strip_style() -> Style {
        Style::default().bg(BRAND_ORANGE).fg(Color::White)
    }

    pub fn strip_heading_style() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn show_all_style() -> Style {
        Style::default()
            .fg(SHOW_ALL)
            .add_modifier(Modifier::BOLD)
    }

    // ── tabs ───────────────────────────────────────────────────
    pub fn active_tab_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(BRAND_ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn inactive_tab_style() -> Style {
        Style::default().fg(MUTED)
    }

    pub fn banner_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(BRAND_ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default()
            .fg(DISCOUNT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn spinner_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
