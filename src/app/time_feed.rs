//! Time-deal feed: one paginated track per hourly window.
//!
//! The "current" and "next" windows paginate independently.  Only the
//! active tab receives scroll-triggered loads; the other track stays frozen
//! until the user switches to it.  A failed fetch on either track puts the
//! whole feed into a blocking error state that only a full reload clears.

use super::feed_runtime::FeedRuntime;
use super::scroll::{ScrollSignal, ScrollSubscription, ScrollTarget};
use crate::api::{FeedKey, TimeSlot, TransportError};
use crate::core::deal::DealPage;
use crate::core::track::{PageOutcome, PageRequest, PaginatedTrack};

pub struct TimeDealFeed {
    session: u64,
    runtime: FeedRuntime,
    active: TimeSlot,
    current: PaginatedTrack,
    next: PaginatedTrack,
    error: bool,
    scroll: Option<ScrollSubscription>,
}

impl TimeDealFeed {
    /// Create the feed with the "current" tab active and fetch its first page.
    pub fn mount(runtime: FeedRuntime, session: u64) -> Self {
        let mut feed = Self {
            session,
            runtime,
            active: TimeSlot::Current,
            current: PaginatedTrack::new(),
            next: PaginatedTrack::new(),
            error: false,
            scroll: None,
        };
        feed.enter(TimeSlot::Current);
        feed
    }

    pub fn active(&self) -> TimeSlot {
        self.active
    }

    pub fn track(&self, slot: TimeSlot) -> &PaginatedTrack {
        match slot {
            TimeSlot::Current => &self.current,
            TimeSlot::Next => &self.next,
        }
    }

    pub fn active_track(&self) -> &PaginatedTrack {
        self.track(self.active)
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Explicit user tab selection.
    pub fn select_tab(&mut self, slot: TimeSlot) {
        if self.active != slot {
            tracing::debug!(?slot, "time-deal tab selected");
        }
        self.active = slot;
        self.enter(slot);
    }

    /// Scroll proximity fired: load the next page of the active tab only.
    /// Returns whether a fetch was issued.
    pub fn near_bottom(&mut self) -> bool {
        self.request(self.active)
    }

    /// Claim the scroll listener slot.  Keeps an existing claim as is.
    pub fn attach_scroll(&mut self, signal: &ScrollSignal) {
        let holds_slot = self.scroll.as_ref().is_some_and(|s| s.is_current());
        if !holds_slot {
            self.scroll = Some(signal.subscribe(ScrollTarget::TimeDeals));
        }
    }

    pub fn detach_scroll(&mut self) {
        self.scroll = None;
    }

    /// Apply a page result for one of the windows.
    pub fn apply_page(
        &mut self,
        slot: TimeSlot,
        request: PageRequest,
        result: Result<DealPage, TransportError>,
    ) {
        let track = match slot {
            TimeSlot::Current => &mut self.current,
            TimeSlot::Next => &mut self.next,
        };
        match track.complete(request, result) {
            Ok(PageOutcome::Appended(count)) => {
                tracing::debug!(
                    ?slot,
                    page = request.page,
                    count,
                    last = track.is_last_page(),
                    "time deals appended"
                );
            }
            Ok(PageOutcome::Stale) => {
                tracing::debug!(?slot, page = request.page, "stale time-deal page ignored");
            }
            Err(err) => {
                if !self.error {
                    tracing::warn!(?slot, page = request.page, %err, "time-deal fetch failed");
                }
                self.error = true;
            }
        }
    }

    /// Entry behaviour of a tab: fetch page 1 if the track has nothing yet.
    fn enter(&mut self, slot: TimeSlot) {
        if self.track(slot).is_empty() {
            self.request(slot);
        }
    }

    fn request(&mut self, slot: TimeSlot) -> bool {
        let session = self.session;
        let runtime = &self.runtime;
        let track = match slot {
            TimeSlot::Current => &mut self.current,
            TimeSlot::Next => &mut self.next,
        };
        track.request_next_page(|request| {
            runtime.spawn_page(session, FeedKey::TimeDeals(slot), request)
        })
    }
}
