//! Time-window tab bar, or the closing banner when tabs are not offered.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::api::TimeSlot;
use crate::core::time_window::TimeWindow;

use super::theme::Theme;

pub struct TabBar {
    pub window: TimeWindow,
    pub active: TimeSlot,
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        if let Some(banner) = self.window.banner() {
            Paragraph::new(Line::from(Span::styled(banner, Theme::banner_style())))
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }

        let (current, next) = halves(area);
        for (rect, slot, label) in [
            (current, TimeSlot::Current, self.window.current_label),
            (next, TimeSlot::Next, self.window.next_label),
        ] {
            let style = if slot == self.active {
                Theme::active_tab_style()
            } else {
                Theme::inactive_tab_style()
            };
            buf.set_style(rect, style);
            Paragraph::new(label.unwrap_or_default())
                .style(style)
                .alignment(Alignment::Center)
                .render(rect, buf);
        }
    }
}

fn halves(area: Rect) -> (Rect, Rect) {
    let left = area.width / 2;
    (
        Rect::new(area.x, area.y, left, area.height),
        Rect::new(area.x + left, area.y, area.width - left, area.height),
    )
}

/// Which tab a click at `col` lands on.
pub fn tab_at(area: Rect, col: u16) -> Option<TimeSlot> {
    if area.height == 0 || col < area.x || col >= area.x + area.width {
        return None;
    }
    let (current, _) = halves(area);
    if col < current.x + current.width {
        Some(TimeSlot::Current)
    } else {
        Some(TimeSlot::Next)
    }
}
