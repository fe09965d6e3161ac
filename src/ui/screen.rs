//! Frame composition: turns `AppState` into widgets for one draw.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::state::{AppState, Screen};
use crate::config::Action;
use crate::core::time_window;

use super::deal_list::{CardStyle, DealListWidget};
use super::layout::AppLayout;
use super::popup::{ErrorOverlay, HelpPopup, ERROR_MESSAGE};
use super::spinner::LoadingIndicator;
use super::strip::{DealStrip, StripKind};
use super::tabs::TabBar;
use super::theme::Theme;

const HOME_TITLE: &str = "타임특가";
const CATALOG_TITLE: &str = "오늘의 브랜드딜";
const EMPTY_LIST: &str = "표시할 딜이 없습니다.";

/// Layout of the front screen for the given terminal area.
pub fn screen_layout(state: &AppState, area: Rect) -> AppLayout {
    match state.screen {
        Screen::Home => AppLayout::home(
            area,
            !state.home.lure_deals.is_empty(),
            !state.home.brand_preview.is_empty(),
        ),
        Screen::BrandCatalog => AppLayout::catalog(area),
    }
}

pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.terminal_area = area;
    let layout = screen_layout(state, area);
    let now = state.now();

    match state.screen {
        Screen::Home => draw_home(frame, state, &layout, &now),
        Screen::BrandCatalog => draw_catalog(frame, state, &layout),
    }
    draw_status(frame, state, &layout);

    if state.show_help {
        frame.render_widget(HelpPopup { config: &state.config }, area);
    }
}

fn header(title: &str, back_hint: Option<String>) -> Paragraph<'static> {
    let mut spans = Vec::new();
    if let Some(hint) = back_hint {
        spans.push(Span::styled(format!("‹ {hint}  "), Theme::muted_style()));
    }
    spans.push(Span::styled(title.to_string(), Theme::title_style()));
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn list_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_style())
}

fn draw_home(frame: &mut Frame, state: &mut AppState, layout: &AppLayout, now: &DateTime<Local>) {
    frame.render_widget(header(HOME_TITLE, None), layout.header_area);

    let home = &mut state.home;
    frame.render_stateful_widget(
        DealStrip {
            kind: StripKind::Lure,
            deals: &home.lure_deals,
            now,
        },
        layout.lure_area,
        &mut home.lure_strip,
    );
    frame.render_stateful_widget(
        DealStrip {
            kind: StripKind::Brand,
            deals: &home.brand_preview,
            now,
        },
        layout.brand_area,
        &mut home.brand_strip,
    );

    let feed = &state.home.time_deals;
    frame.render_widget(
        TabBar {
            window: time_window::compute(now),
            active: feed.active(),
        },
        layout.tabs_area,
    );

    let style = state.time_card_style(now);
    let track = state.home.time_deals.active_track();
    let fetching = track.is_fetching();
    let empty = if fetching { "" } else { EMPTY_LIST };
    let list = DealListWidget::new(track.items(), style)
        .block(list_block())
        .empty_text(empty);
    frame.render_stateful_widget(list, layout.list_area, &mut state.home.list);
    frame.render_widget(
        LoadingIndicator {
            visible: fetching,
            tick: state.tick,
        },
        layout.list_area,
    );

    // Everything but the status bar.
    if state.home.time_deals.has_error() {
        let covered = layout.header_area.union(layout.list_area);
        frame.render_widget(ErrorOverlay { config: &state.config }, covered);
    }
}

fn draw_catalog(frame: &mut Frame, state: &mut AppState, layout: &AppLayout) {
    let back = state.config.short_binding(Action::Back);
    frame.render_widget(header(CATALOG_TITLE, Some(back)), layout.header_area);

    let Some(catalog) = state.catalog.as_mut() else {
        return;
    };
    let track = catalog.feed.track();
    let fetching = track.is_fetching();
    let empty = if fetching { "" } else { EMPTY_LIST };
    let list = DealListWidget::new(track.items(), CardStyle::BrandDeal)
        .block(list_block())
        .empty_text(empty);
    frame.render_stateful_widget(list, layout.list_area, &mut catalog.list);
    frame.render_widget(
        LoadingIndicator {
            visible: fetching,
            tick: state.tick,
        },
        layout.list_area,
    );
}

fn draw_status(frame: &mut Frame, state: &AppState, layout: &AppLayout) {
    let catalog_failed = state.screen == Screen::BrandCatalog
        && state.catalog.as_ref().is_some_and(|c| c.feed.has_error());

    let status = if let Some(message) = state.status_message.as_deref() {
        Paragraph::new(message.to_string()).style(Theme::status_bar_style())
    } else if catalog_failed {
        let reload = state.config.short_binding(Action::Reload);
        Paragraph::new(format!("{ERROR_MESSAGE} 새로고침 ({reload})"))
            .style(Theme::status_bar_style().patch(Theme::error_style()))
    } else {
        Paragraph::new(state.config.status_bar_hint()).style(Theme::status_bar_style())
    };
    frame.render_widget(status, layout.status_area);
}
