//! One independently paginated deal collection.
//!
//! A [`PaginatedTrack`] never talks to the network itself.  When a page is
//! due it hands a [`PageRequest`] to the caller-supplied dispatch closure and
//! later receives the outcome through [`PaginatedTrack::complete`].  The
//! in-flight flag is set *before* dispatch, so overlapping triggers collapse
//! into a single outstanding request.

use crate::api::TransportError;
use crate::core::deal::{Deal, DealPage};

/// Identifies one outstanding page fetch.  Results carrying a request that
/// no longer matches the track (e.g. after a reset) are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub page: u32,
}

/// What [`PaginatedTrack::complete`] did with a result.
#[derive(Debug, PartialEq)]
pub enum PageOutcome {
    /// Items were appended (possibly zero of them).
    Appended(usize),
    /// The result belonged to a request the track no longer waits for.
    Stale,
}

#[derive(Debug, Clone)]
pub struct PaginatedTrack {
    items: Vec<Deal>,
    /// Next page to request (1-based).
    page_cursor: u32,
    is_last_page: bool,
    in_flight: Option<PageRequest>,
    epoch: u64,
}

impl Default for PaginatedTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginatedTrack {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page_cursor: 1,
            is_last_page: false,
            in_flight: None,
            epoch: 0,
        }
    }

    /// Build a track from a list handed over by a previous screen.
    ///
    /// A non-empty hand-off counts as the first page, so the next request
    /// asks for page 2.  Whether more pages exist is unknown at this point
    /// and is assumed true.
    pub fn seeded(items: Vec<Deal>) -> Self {
        let page_cursor = if items.is_empty() { 1 } else { 2 };
        Self {
            items,
            page_cursor,
            ..Self::new()
        }
    }

    pub fn items(&self) -> &[Deal] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_cursor(&self) -> u32 {
        self.page_cursor
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ask for the next page.  Returns `false` without calling `dispatch`
    /// while a fetch is outstanding or after the last page arrived.
    pub fn request_next_page<F>(&mut self, dispatch: F) -> bool
    where
        F: FnOnce(PageRequest),
    {
        if self.in_flight.is_some() || self.is_last_page {
            return false;
        }
        let request = PageRequest {
            epoch: self.epoch,
            page: self.page_cursor,
        };
        self.in_flight = Some(request);
        dispatch(request);
        true
    }

    /// Apply the outcome of a fetch previously handed to `dispatch`.
    ///
    /// Failures clear the in-flight flag and are returned to the owner; the
    /// track keeps its items and cursor so it stays usable.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<DealPage, TransportError>,
    ) -> Result<PageOutcome, TransportError> {
        if self.in_flight != Some(request) {
            return Ok(PageOutcome::Stale);
        }
        self.in_flight = None;

        let page = result?;
        let appended = page.item_list.len();
        self.items.extend(page.item_list);
        self.is_last_page = page.is_last_page;
        self.page_cursor += 1;
        Ok(PageOutcome::Appended(appended))
    }

    /// Drop everything and start over from page 1.  A fetch still in flight
    /// will be reported as stale when it lands.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page_cursor = 1;
        self.is_last_page = false;
        self.in_flight = None;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
