//! Layout helpers: split the terminal area into regions.
//!
//! Hidden regions get a zero-height `Rect`, so hit-testing against them
//! never matches.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the lure-deal strip (heading + cards).
pub const LURE_STRIP_HEIGHT: u16 = 6;
/// Rows taken by the brand-deal strip (heading + cards with countdown).
pub const BRAND_STRIP_HEIGHT: u16 = 7;

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppLayout {
    pub header_area: Rect,
    pub lure_area: Rect,
    pub brand_area: Rect,
    /// Tab bar, or the banner when the tabs are hidden.
    pub tabs_area: Rect,
    pub list_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Home screen.  Strips that have nothing to show collapse.
    pub fn home(area: Rect, show_lure: bool, show_brand: bool) -> Self {
        let strip = |visible: bool, height: u16| {
            if visible {
                Constraint::Length(height)
            } else {
                Constraint::Length(0)
            }
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                strip(show_lure, LURE_STRIP_HEIGHT),
                strip(show_brand, BRAND_STRIP_HEIGHT),
                Constraint::Length(1), // tabs / banner
                Constraint::Min(3),    // deal list (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            header_area: chunks[0],
            lure_area: chunks[1],
            brand_area: chunks[2],
            tabs_area: chunks[3],
            list_area: chunks[4],
            status_area: chunks[5],
        }
    }

    /// Brand catalog screen: header, list and status bar only.
    pub fn catalog(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header_area: chunks[0],
            list_area: chunks[1],
            status_area: chunks[2],
            ..Self::default()
        }
    }
}

pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_strips_collapse() {
        let area = Rect::new(0, 0, 80, 40);
        let layout = AppLayout::home(area, false, true);
        assert_eq!(layout.lure_area.height, 0);
        assert_eq!(layout.brand_area.height, BRAND_STRIP_HEIGHT);
        assert_eq!(layout.tabs_area.y, 1 + BRAND_STRIP_HEIGHT);
        assert_eq!(layout.status_area.y, 39);
        assert!(!point_in_rect(layout.lure_area, 5, 1));
    }

    #[test]
    fn catalog_list_fills_the_middle() {
        let layout = AppLayout::catalog(Rect::new(0, 0, 80, 20));
        assert_eq!(layout.list_area, Rect::new(0, 1, 80, 18));
        assert_eq!(layout.tabs_area, Rect::default());
    }
}
