//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::api::TimeSlot;
use crate::config::Action;
use crate::ui::deal_list::CardStyle;
use crate::ui::layout::point_in_rect;
use crate::ui::screen::screen_layout;
use crate::ui::strip::{self, StripKind};
use crate::ui::tabs;

use super::state::{AppState, Screen};

/// Rows moved per wheel notch.
const WHEEL_STEP: isize = 3;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    // Any key press dismisses a transient status message.
    state.status_message = None;

    if state.show_help {
        match action {
            Action::ToggleHelp | Action::Back => state.show_help = false,
            Action::Quit => state.should_quit = true,
            _ => {}
        }
        return;
    }

    // The error overlay swallows everything but reload and quit.
    if state.has_blocking_error() {
        match action {
            Action::Reload => state.reload(),
            Action::Quit => state.should_quit = true,
            _ => {}
        }
        return;
    }

    match action {
        Action::Quit => state.should_quit = true,
        Action::ToggleHelp => state.show_help = true,
        Action::Reload => state.reload(),
        Action::ScrollUp => {
            state.scroll_by(-1);
        }
        Action::ScrollDown => {
            state.scroll_by(1);
        }
        Action::PageUp => {
            state.scroll_page(-1);
        }
        Action::PageDown => {
            state.scroll_page(1);
        }
        Action::Top => {
            state.scroll_to_top();
        }
        Action::Bottom => {
            state.scroll_to_bottom();
        }
        Action::CurrentTab => state.select_tab(TimeSlot::Current),
        Action::NextTab => state.select_tab(TimeSlot::Next),
        Action::OpenBrandDeals => {
            if state.screen == Screen::Home {
                state.open_brand_catalog();
            }
        }
        Action::Back => state.back_home(),
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.show_help || state.has_blocking_error() {
        return;
    }

    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if !scroll_strip_at(state, col, row, -1) {
                state.scroll_by(-WHEEL_STEP);
            }
        }
        MouseEventKind::ScrollDown => {
            if !scroll_strip_at(state, col, row, 1) {
                state.scroll_by(WHEEL_STEP);
            }
        }
        MouseEventKind::ScrollLeft => {
            scroll_strip_at(state, col, row, -1);
        }
        MouseEventKind::ScrollRight => {
            scroll_strip_at(state, col, row, 1);
        }
        MouseEventKind::Down(MouseButton::Left) => handle_click(state, col, row),
        _ => {}
    }
}

/// The wheel over a home strip moves it sideways one card per notch.
/// Returns whether the pointer was over a strip.
fn scroll_strip_at(state: &mut AppState, col: u16, row: u16, delta: isize) -> bool {
    if state.screen != Screen::Home {
        return false;
    }
    let layout = screen_layout(state, state.terminal_area);
    let strips = [
        (StripKind::Lure, layout.lure_area),
        (StripKind::Brand, layout.brand_area),
    ];
    for (kind, area) in strips {
        if point_in_rect(area, col, row) {
            state.scroll_strip(kind, delta, strip::visible_cards(area));
            return true;
        }
    }
    false
}

fn handle_click(state: &mut AppState, col: u16, row: u16) {
    state.status_message = None;
    let layout = screen_layout(state, state.terminal_area);

    if state.screen == Screen::Home {
        if strip::show_all_rect(layout.brand_area).is_some_and(|r| point_in_rect(r, col, row)) {
            state.open_brand_catalog();
            return;
        }
        if point_in_rect(layout.tabs_area, col, row) {
            if let Some(slot) = tabs::tab_at(layout.tabs_area, col) {
                state.select_tab(slot);
            }
            return;
        }
        let strips = [
            (layout.lure_area, state.home.lure_deals.len(), state.home.lure_strip.offset),
            (layout.brand_area, state.home.brand_preview.len(), state.home.brand_strip.offset),
        ];
        for (area, count, offset) in strips {
            // Row 0 of a strip is its heading.
            if point_in_rect(area, col, row) && row > area.y {
                if strip::card_at(area, col, count, offset).is_some() {
                    state.activate_card();
                }
                return;
            }
        }
    }

    if point_in_rect(layout.list_area, col, row) && row > layout.list_area.y {
        let inner_row = (row - layout.list_area.y - 1) as usize;
        let hit = match state.screen {
            Screen::Home => {
                let style = state.time_card_style(&state.now());
                let count = state.home.time_deals.active_track().items().len();
                state.home.list.card_at(inner_row, style, count)
            }
            Screen::BrandCatalog => state.catalog.as_ref().and_then(|c| {
                c.list
                    .card_at(inner_row, CardStyle::BrandDeal, c.feed.track().items().len())
            }),
        };
        if hit.is_some() {
            state.activate_card();
        }
    }
}
