//! Brand-deal catalog feed: a single track driven by scroll proximity.
//!
//! When opened from the home screen it is seeded with the preview list the
//! home screen already fetched, which stands in for page 1.

use super::feed_runtime::FeedRuntime;
use super::scroll::{ScrollSignal, ScrollSubscription, ScrollTarget};
use crate::api::{FeedKey, TransportError};
use crate::core::deal::{Deal, DealPage};
use crate::core::track::{PageOutcome, PageRequest, PaginatedTrack};

pub struct BrandDealFeed {
    session: u64,
    runtime: FeedRuntime,
    track: PaginatedTrack,
    error: bool,
    scroll: Option<ScrollSubscription>,
}

impl BrandDealFeed {
    /// Mount the catalog.  An empty hand-off triggers an immediate page-1
    /// fetch; a non-empty one is shown as is and the next load asks for
    /// page 2.
    pub fn mount(runtime: FeedRuntime, session: u64, handoff: Vec<Deal>) -> Self {
        let seeded = !handoff.is_empty();
        let mut feed = Self {
            session,
            runtime,
            track: PaginatedTrack::seeded(handoff),
            error: false,
            scroll: None,
        };
        if !seeded {
            feed.request();
        }
        feed
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn track(&self) -> &PaginatedTrack {
        &self.track
    }

    /// Set after a failed fetch.  Unlike the time-deal feed this does not
    /// block the screen; the catalog can be reloaded in place.
    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn near_bottom(&mut self) -> bool {
        self.request()
    }

    /// Start over from page 1, dropping the hand-off and the error flag.
    /// A fetch still in flight lands as stale.
    pub fn reload(&mut self) {
        self.track.reset();
        self.error = false;
        self.request();
    }

    pub fn attach_scroll(&mut self, signal: &ScrollSignal) {
        let holds_slot = self.scroll.as_ref().is_some_and(|s| s.is_current());
        if !holds_slot {
            self.scroll = Some(signal.subscribe(ScrollTarget::BrandDeals));
        }
    }

    pub fn detach_scroll(&mut self) {
        self.scroll = None;
    }

    pub fn apply_page(&mut self, request: PageRequest, result: Result<DealPage, TransportError>) {
        match self.track.complete(request, result) {
            Ok(PageOutcome::Appended(count)) => {
                tracing::debug!(
                    page = request.page,
                    count,
                    next = self.track.page_cursor(),
                    last = self.track.is_last_page(),
                    "brand deals appended"
                );
            }
            Ok(PageOutcome::Stale) => {
                tracing::debug!(page = request.page, "stale brand-deal page ignored");
            }
            Err(err) => {
                tracing::warn!(page = request.page, %err, "brand-deal fetch failed");
                self.error = true;
            }
        }
    }

    fn request(&mut self) -> bool {
        let session = self.session;
        let runtime = &self.runtime;
        self.track.request_next_page(|request| {
            runtime.spawn_page(session, FeedKey::BrandDeals, request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::feed_runtime::fake::{self, FakeSource};
    use crate::app::feed_runtime::FeedUpdate;
    use crate::core::deal::sample_deal;

    fn apply(feed: &mut BrandDealFeed, update: FeedUpdate) {
        match update {
            FeedUpdate::Page {
                feed: FeedKey::BrandDeals,
                request,
                result,
                ..
            } => feed.apply_page(request, result),
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[tokio::test]
    async fn unseeded_mount_fetches_page_one() {
        let source = FakeSource::new(3, 2);
        let (runtime, mut rx) = fake::runtime(source.clone());
        let mut feed = BrandDealFeed::mount(runtime, 7, Vec::new());

        apply(&mut feed, fake::next_update(&mut rx).await);
        assert_eq!(feed.track().items().len(), 3);
        assert_eq!(source.requested(), vec![(FeedKey::BrandDeals, 1)]);
    }

    #[tokio::test]
    async fn seeded_mount_skips_page_one() {
        let source = FakeSource::new(3, 2);
        let (runtime, mut rx) = fake::runtime(source.clone());
        let handoff = vec![sample_deal(1), sample_deal(2)];
        let mut feed = BrandDealFeed::mount(runtime, 7, handoff);

        fake::assert_quiet(&mut rx).await;
        assert_eq!(source.calls(), 0);
        assert_eq!(feed.track().items().len(), 2);

        assert!(feed.near_bottom());
        apply(&mut feed, fake::next_update(&mut rx).await);
        assert_eq!(source.requested(), vec![(FeedKey::BrandDeals, 2)]);
        assert_eq!(feed.track().items().len(), 5);
        assert!(feed.track().is_last_page());

        assert!(!feed.near_bottom());
    }

    #[tokio::test]
    async fn overlapping_scroll_signals_collapse() {
        let source = FakeSource::new(3, 5);
        let (runtime, mut rx) = fake::runtime(source.clone());
        let mut feed = BrandDealFeed::mount(runtime, 7, vec![sample_deal(1)]);

        assert!(feed.near_bottom());
        assert!(!feed.near_bottom());
        apply(&mut feed, fake::next_update(&mut rx).await);
        fake::assert_quiet(&mut rx).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_flagged_and_recoverable() {
        let source = FakeSource::new(3, 5);
        source.fail(FeedKey::BrandDeals);
        let (runtime, mut rx) = fake::runtime(source.clone());
        let mut feed = BrandDealFeed::mount(runtime, 7, Vec::new());

        apply(&mut feed, fake::next_update(&mut rx).await);
        assert!(feed.has_error());
        assert!(!feed.track().is_fetching());

        // The gate is open again, so another attempt goes out.
        assert!(feed.near_bottom());
        assert_eq!(feed.track().page_cursor(), 1);
    }

    #[tokio::test]
    async fn detaching_frees_the_scroll_slot() {
        let source = FakeSource::new(3, 5);
        let (runtime, _rx) = fake::runtime(source);
        let signal = ScrollSignal::new();
        let mut feed = BrandDealFeed::mount(runtime, 7, vec![sample_deal(1)]);

        feed.attach_scroll(&signal);
        assert_eq!(signal.listener(), Some(ScrollTarget::BrandDeals));
        feed.detach_scroll();
        assert_eq!(signal.listener(), None);
    }

    #[tokio::test]
    async fn reload_discards_handoff_and_in_flight_page() {
        let source = FakeSource::new(3, 5);
        let (runtime, mut rx) = fake::runtime(source.clone());
        let mut feed = BrandDealFeed::mount(runtime, 7, vec![sample_deal(1)]);

        source.hold();
        assert!(feed.near_bottom());
        feed.reload();
        assert!(feed.track().is_empty());
        assert!(feed.track().is_fetching());
        source.release();

        for _ in 0..2 {
            apply(&mut feed, fake::next_update(&mut rx).await);
        }
        assert!(!feed.has_error());
        assert_eq!(feed.track().items().len(), 3);
        assert_eq!(feed.track().items()[0].id, 3000);
        assert_eq!(feed.track().page_cursor(), 2);
        assert_eq!(
            source.requested(),
            vec![(FeedKey::BrandDeals, 2), (FeedKey::BrandDeals, 1)]
        );
    }
}
