//! Popup overlay widgets: the blocking error overlay and the help popup.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

pub const ERROR_MESSAGE: &str = "에러가 발생했습니다.";

// ───────────────────────────────────────── error overlay ─────

/// Covers the feed after a time-deal fetch failure.  Only a reload gets
/// the user out.
pub struct ErrorOverlay<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for ErrorOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let popup = centered_fixed(36, 7, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::error_style());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let reload = format!(
            "[ 새로고침 ({}) ]",
            self.config.short_binding(Action::Reload)
        );
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(ERROR_MESSAGE, Theme::error_style())),
            Line::raw(""),
            Line::from(Span::styled(reload, Theme::active_tab_style())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

// ───────────────────────────────────────── help popup ────────

/// Key binding reference.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 1 blank + 1 hint + 2 border
        let height = (Action::ALL.len() as u16) + 5;
        let popup = centered_fixed(48, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Controls ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::with_capacity(Action::ALL.len() + 3);
        lines.push(Line::raw(""));

        for &action in Action::ALL {
            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("   {:<22}", action.label());
            let keys_width = (inner.width as usize).saturating_sub(label_col.len() + 1).max(1);
            let keys_col = format!("{:>keys_width$}", self.config.display_bindings(action));
            lines.push(Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(keys_col, Style::default().fg(Color::Yellow)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("  Bindings: {}", crate::config::config_path().display()),
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
