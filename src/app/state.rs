//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! Each screen owns its feed controllers; tearing a screen down drops them,
//! which releases the scroll listener and orphans any fetch still in flight
//! (its update arrives with a retired session id and is discarded).

use chrono::{DateTime, Local};
use ratatui::layout::Rect;

use super::brand_feed::BrandDealFeed;
use super::feed_runtime::{next_session, FeedRuntime, FeedUpdate};
use super::scroll::{ScrollMetrics, ScrollSignal, ScrollTarget};
use super::time_feed::TimeDealFeed;
use crate::api::{FeedKey, TimeSlot};
use crate::config::AppConfig;
use crate::core::deal::Deal;
use crate::core::time_window::{self, Clock};
use crate::ui::deal_list::{CardStyle, DealListState};
use crate::ui::strip::{StripKind, StripState};

/// Status text for activating a card; detail pages are not available.
pub const NOT_READY_MESSAGE: &str = "준비중입니다.";

/// Which screen is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    BrandCatalog,
}

/// Landing screen: two promo strips above the time-deal feed.
pub struct HomeScreen {
    pub session: u64,
    /// Hidden while empty (not loaded yet, or the fetch failed).
    pub lure_deals: Vec<Deal>,
    /// First page of the brand catalog; handed to the catalog screen.
    pub brand_preview: Vec<Deal>,
    pub time_deals: TimeDealFeed,
    pub list: DealListState,
    pub lure_strip: StripState,
    pub brand_strip: StripState,
}

impl HomeScreen {
    pub fn mount(runtime: &FeedRuntime) -> Self {
        let session = next_session();
        runtime.spawn_lure_deals(session);
        runtime.spawn_brand_preview(session);
        Self {
            session,
            lure_deals: Vec::new(),
            brand_preview: Vec::new(),
            time_deals: TimeDealFeed::mount(runtime.clone(), session),
            list: DealListState::default(),
            lure_strip: StripState::default(),
            brand_strip: StripState::default(),
        }
    }
}

pub struct CatalogScreen {
    pub feed: BrandDealFeed,
    pub list: DealListState,
}

impl CatalogScreen {
    pub fn mount(runtime: &FeedRuntime, handoff: Vec<Deal>) -> Self {
        Self {
            feed: BrandDealFeed::mount(runtime.clone(), next_session(), handoff),
            list: DealListState::default(),
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// User-configurable keybindings and service settings.
    pub config: AppConfig,
    pub clock: Clock,
    pub runtime: FeedRuntime,
    /// Process-wide near-bottom signal; at most one feed listens.
    pub scroll: ScrollSignal,
    pub screen: Screen,
    pub home: HomeScreen,
    /// Present only while the catalog is open.
    pub catalog: Option<CatalogScreen>,
    pub show_help: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Monotonic tick counter (drives spinners).
    pub tick: u64,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(config: AppConfig, clock: Clock, runtime: FeedRuntime) -> Self {
        let scroll = ScrollSignal::new();
        let mut home = HomeScreen::mount(&runtime);
        home.time_deals.attach_scroll(&scroll);
        Self {
            config,
            clock,
            runtime,
            scroll,
            screen: Screen::Home,
            home,
            catalog: None,
            show_help: false,
            status_message: None,
            should_quit: false,
            tick: 0,
            terminal_area: Rect::default(),
        }
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Card style for the time-deal list at `now`.  Cards are "upcoming"
    /// on the next tab, or when no window is open at all.
    pub fn time_card_style(&self, now: &DateTime<Local>) -> CardStyle {
        let window = time_window::compute(now);
        CardStyle::TimeDeal {
            upcoming: window.current_label.is_none()
                || self.home.time_deals.active() == TimeSlot::Next,
        }
    }

    /// Whether the time-deal feed is blocked by a fetch failure.
    pub fn has_blocking_error(&self) -> bool {
        self.screen == Screen::Home && self.home.time_deals.has_error()
    }

    // ── navigation ─────────────────────────────────────────────

    /// Open the brand catalog, seeded with the home screen's preview.
    pub fn open_brand_catalog(&mut self) {
        if self.screen == Screen::BrandCatalog {
            return;
        }
        let handoff = self.home.brand_preview.clone();
        tracing::info!(seeded = handoff.len(), "opening brand catalog");
        self.home.time_deals.detach_scroll();
        let mut catalog = CatalogScreen::mount(&self.runtime, handoff);
        catalog.feed.attach_scroll(&self.scroll);
        self.catalog = Some(catalog);
        self.screen = Screen::BrandCatalog;
    }

    pub fn back_home(&mut self) {
        if self.screen == Screen::Home {
            return;
        }
        tracing::info!("returning to home screen");
        if let Some(mut catalog) = self.catalog.take() {
            catalog.feed.detach_scroll();
        }
        self.home.time_deals.attach_scroll(&self.scroll);
        self.screen = Screen::Home;
    }

    /// Reload the front screen.  The home screen is remounted as a whole;
    /// the catalog resets its track and starts again from page 1.
    pub fn reload(&mut self) {
        self.status_message = None;
        match self.screen {
            Screen::Home => {
                tracing::info!("reloading home screen");
                let mut home = HomeScreen::mount(&self.runtime);
                home.time_deals.attach_scroll(&self.scroll);
                self.home = home;
            }
            Screen::BrandCatalog => {
                tracing::info!("reloading brand catalog");
                if let Some(catalog) = self.catalog.as_mut() {
                    catalog.feed.reload();
                    catalog.list.scroll_to_top();
                }
            }
        }
    }

    /// Explicit tab selection.  Ignored while the tab switcher is hidden.
    pub fn select_tab(&mut self, slot: TimeSlot) {
        if self.screen != Screen::Home || !time_window::compute(&self.now()).show_tabs() {
            return;
        }
        if self.home.time_deals.active() != slot {
            self.home.list.scroll_to_top();
        }
        self.home.time_deals.select_tab(slot);
    }

    pub fn activate_card(&mut self) {
        self.status_message = Some(NOT_READY_MESSAGE.to_string());
    }

    /// Per-tick housekeeping.  When the clock rolls into a window without
    /// tabs, the feed falls back to the current tab.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        let tabs_hidden = !time_window::compute(&self.now()).show_tabs();
        if tabs_hidden && self.home.time_deals.active() == TimeSlot::Next {
            self.home.time_deals.select_tab(TimeSlot::Current);
            self.home.list.scroll_to_top();
        }
    }

    // ── background results ─────────────────────────────────────

    /// Route a fetch result to the controller that asked for it.  Results
    /// for screens that have since been torn down or reloaded are dropped.
    pub fn apply_update(&mut self, update: FeedUpdate) {
        let home_session = self.home.session;
        let catalog_session = self.catalog.as_ref().map(|c| c.feed.session());
        match update {
            FeedUpdate::Page {
                session,
                feed: FeedKey::TimeDeals(slot),
                request,
                result,
            } if session == home_session => {
                self.home.time_deals.apply_page(slot, request, result);
            }
            FeedUpdate::Page {
                session,
                feed: FeedKey::BrandDeals,
                request,
                result,
            } if Some(session) == catalog_session => {
                if let Some(catalog) = self.catalog.as_mut() {
                    catalog.feed.apply_page(request, result);
                }
            }
            FeedUpdate::LureDeals { session, result } if session == home_session => match result {
                Ok(deals) => self.home.lure_deals = deals,
                Err(err) => tracing::warn!(%err, "lure deals unavailable"),
            },
            FeedUpdate::BrandPreview { session, result } if session == home_session => {
                match result {
                    Ok(page) => self.home.brand_preview = page.item_list,
                    Err(err) => tracing::warn!(%err, "brand preview unavailable"),
                }
            }
            stale => {
                tracing::debug!(session = stale.session(), "dropping update for a retired screen");
            }
        }
    }

    // ── scrolling ──────────────────────────────────────────────

    fn list_and_rows(&mut self) -> Option<(&mut DealListState, usize)> {
        match self.screen {
            Screen::Home => {
                let style = self.time_card_style(&self.now());
                let count = self.home.time_deals.active_track().items().len();
                Some((&mut self.home.list, style.content_rows(count)))
            }
            Screen::BrandCatalog => {
                let catalog = self.catalog.as_mut()?;
                let count = catalog.feed.track().items().len();
                Some((&mut catalog.list, CardStyle::BrandDeal.content_rows(count)))
            }
        }
    }

    /// Scroll the front list by `delta` rows and notify the scroll listener.
    /// Returns whether a page fetch was issued.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let Some((list, rows)) = self.list_and_rows() else {
            return false;
        };
        list.scroll_by(delta, rows);
        let metrics = list.metrics(rows);
        self.notify_scroll(metrics)
    }

    /// Scroll by a page in the given direction (+1 / -1).
    pub fn scroll_page(&mut self, direction: isize) -> bool {
        let viewport = self.list_and_rows().map_or(1, |(list, _)| list.viewport.max(1));
        self.scroll_by(direction * viewport as isize)
    }

    pub fn scroll_to_top(&mut self) -> bool {
        let Some((list, rows)) = self.list_and_rows() else {
            return false;
        };
        list.scroll_to_top();
        let metrics = list.metrics(rows);
        self.notify_scroll(metrics)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        let Some((list, rows)) = self.list_and_rows() else {
            return false;
        };
        list.scroll_to_bottom(rows);
        let metrics = list.metrics(rows);
        self.notify_scroll(metrics)
    }

    /// Scroll a home strip sideways by `delta` cards; `visible` is how many
    /// fit on screen.
    pub fn scroll_strip(&mut self, kind: StripKind, delta: isize, visible: usize) {
        let home = &mut self.home;
        let (strip, count) = match kind {
            StripKind::Lure => (&mut home.lure_strip, home.lure_deals.len()),
            StripKind::Brand => (&mut home.brand_strip, home.brand_preview.len()),
        };
        strip.scroll_by(delta, count, visible);
    }

    fn notify_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        match self.scroll.observe(metrics) {
            Some(ScrollTarget::TimeDeals) => self.home.time_deals.near_bottom(),
            Some(ScrollTarget::BrandDeals) => self
                .catalog
                .as_mut()
                .is_some_and(|catalog| catalog.feed.near_bottom()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::feed_runtime::fake::{self, FakeSource};
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn mounted(
        source: &Arc<FakeSource>,
    ) -> (AppState, UnboundedReceiver<FeedUpdate>) {
        let (runtime, mut rx) = fake::runtime(source.clone());
        let mut state = AppState::new(AppConfig::default(), Clock::PinnedHour(9), runtime);
        // Lure deals, brand preview and the first time-deal page.
        for _ in 0..3 {
            let update = fake::next_update(&mut rx).await;
            state.apply_update(update);
        }
        state.home.list.viewport = 8;
        (state, rx)
    }

    #[tokio::test]
    async fn home_mount_loads_strips_and_first_page() {
        let source = FakeSource::new(4, 3);
        let (state, _rx) = mounted(&source).await;

        assert_eq!(state.home.lure_deals.len(), 3);
        assert_eq!(state.home.brand_preview.len(), 4);
        assert_eq!(state.home.time_deals.active_track().items().len(), 4);
        assert_eq!(state.scroll.listener(), Some(ScrollTarget::TimeDeals));
    }

    #[tokio::test]
    async fn scrolling_to_bottom_loads_next_page() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;

        assert!(state.scroll_to_bottom());
        state.apply_update(fake::next_update(&mut rx).await);
        assert_eq!(state.home.time_deals.active_track().items().len(), 8);
        assert_eq!(
            source.requested().last(),
            Some(&(FeedKey::TimeDeals(TimeSlot::Current), 2))
        );
    }

    #[tokio::test]
    async fn scrolling_far_from_bottom_does_not_fetch() {
        let source = FakeSource::new(10, 3);
        let (mut state, mut rx) = mounted(&source).await;

        assert!(!state.scroll_by(1));
        fake::assert_quiet(&mut rx).await;
    }

    #[tokio::test]
    async fn catalog_is_seeded_with_preview_and_moves_listener() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;
        let calls = source.calls();

        state.open_brand_catalog();
        assert_eq!(state.screen, Screen::BrandCatalog);
        assert_eq!(state.scroll.listener(), Some(ScrollTarget::BrandDeals));
        fake::assert_quiet(&mut rx).await;
        assert_eq!(source.calls(), calls);

        let catalog = state.catalog.as_ref().unwrap();
        assert_eq!(catalog.feed.track().items(), state.home.brand_preview.as_slice());
        assert_eq!(catalog.feed.track().page_cursor(), 2);

        state.back_home();
        assert!(state.catalog.is_none());
        assert_eq!(state.scroll.listener(), Some(ScrollTarget::TimeDeals));
    }

    #[tokio::test]
    async fn updates_for_a_closed_catalog_are_dropped() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;

        state.open_brand_catalog();
        state.catalog.as_mut().unwrap().list.viewport = 8;
        assert!(state.scroll_to_bottom());
        state.back_home();

        let update = fake::next_update(&mut rx).await;
        state.apply_update(update);
        assert!(state.catalog.is_none());
        assert_eq!(state.home.brand_preview.len(), 4);
    }

    #[tokio::test]
    async fn reload_retires_the_old_home_session() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;
        let old_session = state.home.session;

        source.hold();
        assert!(state.scroll_to_bottom());
        state.reload();
        assert_ne!(state.home.session, old_session);
        assert_eq!(state.scroll.listener(), Some(ScrollTarget::TimeDeals));
        source.release();

        // The held page 2 plus the fresh mount's three fetches.
        for _ in 0..4 {
            let update = fake::next_update(&mut rx).await;
            state.apply_update(update);
        }
        assert_eq!(state.home.time_deals.active_track().items().len(), 4);
        assert_eq!(state.home.time_deals.active_track().page_cursor(), 2);
    }

    #[tokio::test]
    async fn catalog_reload_fetches_first_page() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;

        state.open_brand_catalog();
        state.reload();
        let update = fake::next_update(&mut rx).await;
        state.apply_update(update);

        assert_eq!(source.requested().last(), Some(&(FeedKey::BrandDeals, 1)));
        let catalog = state.catalog.as_ref().unwrap();
        assert_eq!(catalog.feed.track().items().len(), 4);
    }

    #[tokio::test]
    async fn tab_selection_resets_offset() {
        let source = FakeSource::new(4, 3);
        let (mut state, mut rx) = mounted(&source).await;
        state.home.list.offset = 3;

        state.select_tab(TimeSlot::Next);
        assert_eq!(state.home.time_deals.active(), TimeSlot::Next);
        assert_eq!(state.home.list.offset, 0);
        assert_eq!(
            state.time_card_style(&state.now()),
            CardStyle::TimeDeal { upcoming: true }
        );
        state.apply_update(fake::next_update(&mut rx).await);
        assert_eq!(state.home.time_deals.track(TimeSlot::Next).items().len(), 4);
    }

    #[tokio::test]
    async fn tabs_are_locked_in_the_last_window() {
        let source = FakeSource::new(4, 3);
        let (runtime, _rx) = fake::runtime(source);
        let mut state = AppState::new(AppConfig::default(), Clock::PinnedHour(22), runtime);

        state.select_tab(TimeSlot::Next);
        assert_eq!(state.home.time_deals.active(), TimeSlot::Current);
    }

    #[tokio::test]
    async fn activating_a_card_reports_not_ready() {
        let source = FakeSource::new(1, 1);
        let (runtime, _rx) = fake::runtime(source);
        let mut state = AppState::new(AppConfig::default(), Clock::PinnedHour(9), runtime);
        state.activate_card();
        assert_eq!(state.status_message.as_deref(), Some(NOT_READY_MESSAGE));
    }
}
