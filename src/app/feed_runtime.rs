//! Background fetch jobs so the UI loop never waits on the network.
//!
//! Every job runs as a tokio task and reports back through one unbounded
//! channel.  Updates are tagged with the session of the screen that asked
//! for them; the main loop drops updates whose screen has since been torn
//! down or reloaded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{DealSource, FeedKey, TransportError};
use crate::core::deal::{Deal, DealPage};
use crate::core::track::PageRequest;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh session id for a newly mounted screen.
pub fn next_session() -> u64 {
    NEXT_SESSION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
pub enum FeedUpdate {
    Page {
        session: u64,
        feed: FeedKey,
        request: PageRequest,
        result: Result<DealPage, TransportError>,
    },
    LureDeals {
        session: u64,
        result: Result<Vec<Deal>, TransportError>,
    },
    BrandPreview {
        session: u64,
        result: Result<DealPage, TransportError>,
    },
}

impl FeedUpdate {
    pub fn session(&self) -> u64 {
        match self {
            FeedUpdate::Page { session, .. }
            | FeedUpdate::LureDeals { session, .. }
            | FeedUpdate::BrandPreview { session, .. } => *session,
        }
    }
}

/// Handle shared by every controller: the fetch capability plus the channel
/// results come back on.  Cloning is cheap.
#[derive(Clone)]
pub struct FeedRuntime {
    source: Arc<dyn DealSource>,
    tx: mpsc::UnboundedSender<FeedUpdate>,
}

impl FeedRuntime {
    pub fn new(source: Arc<dyn DealSource>, tx: mpsc::UnboundedSender<FeedUpdate>) -> Self {
        Self { source, tx }
    }

    pub fn spawn_page(&self, session: u64, feed: FeedKey, request: PageRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(session, ?feed, page = request.page, "fetching page");
        tokio::spawn(async move {
            let result = source.fetch_page(feed, request.page).await;
            let _ = tx.send(FeedUpdate::Page {
                session,
                feed,
                request,
                result,
            });
        });
    }

    pub fn spawn_lure_deals(&self, session: u64) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_lure_deals().await;
            let _ = tx.send(FeedUpdate::LureDeals { session, result });
        });
    }

    /// First page of the brand catalog, shown as a strip on the home screen
    /// and handed to the catalog screen when it opens.
    pub fn spawn_brand_preview(&self, session: u64) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(FeedKey::BrandDeals, 1).await;
            let _ = tx.send(FeedUpdate::BrandPreview { session, result });
        });
    }
}

// ───────────────────────────────────────── test support ──────

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`DealSource`] for controller tests.

    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{mpsc, Notify};

    use super::{FeedRuntime, FeedUpdate};
    use crate::api::{DealSource, FeedKey, TransportError};
    use crate::core::deal::{sample_deal, Deal, DealPage};

    /// Serves `pages_per_feed` pages of `per_page` deals for every feed.
    /// Requests can be held open until [`FakeSource::release`] and any feed
    /// can be switched to failing.
    #[derive(Default)]
    pub struct FakeSource {
        pub per_page: u64,
        pub pages_per_feed: u32,
        lure_count: AtomicU64,
        calls: AtomicUsize,
        log: Mutex<Vec<(FeedKey, u32)>>,
        failing: Mutex<Vec<FeedKey>>,
        hold: Mutex<bool>,
        gate: Notify,
    }

    impl FakeSource {
        pub fn new(per_page: u64, pages_per_feed: u32) -> Arc<Self> {
            Arc::new(Self {
                per_page,
                pages_per_feed,
                lure_count: AtomicU64::new(3),
                ..Self::default()
            })
        }

        pub fn set_lure_count(&self, count: u64) {
            self.lure_count.store(count, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<(FeedKey, u32)> {
            self.log.lock().unwrap().clone()
        }

        pub fn fail(&self, feed: FeedKey) {
            self.failing.lock().unwrap().push(feed);
        }

        pub fn hold(&self) {
            *self.hold.lock().unwrap() = true;
        }

        pub fn release(&self) {
            *self.hold.lock().unwrap() = false;
            self.gate.notify_waiters();
        }

        fn page(&self, feed: FeedKey, page: u32) -> DealPage {
            let base = match feed {
                FeedKey::TimeDeals(crate::api::TimeSlot::Current) => 1_000,
                FeedKey::TimeDeals(crate::api::TimeSlot::Next) => 2_000,
                FeedKey::BrandDeals => 3_000,
            };
            let start = base + (page as u64 - 1) * self.per_page;
            DealPage {
                item_list: (start..start + self.per_page).map(sample_deal).collect(),
                is_last_page: page >= self.pages_per_feed,
            }
        }
    }

    #[async_trait]
    impl DealSource for FakeSource {
        async fn fetch_page(&self, feed: FeedKey, page: u32) -> Result<DealPage, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push((feed, page));
            loop {
                let notified = self.gate.notified();
                if !*self.hold.lock().unwrap() {
                    break;
                }
                notified.await;
            }
            if self.failing.lock().unwrap().contains(&feed) {
                return Err(TransportError::Status(503));
            }
            Ok(self.page(feed, page))
        }

        async fn fetch_lure_deals(&self) -> Result<Vec<Deal>, TransportError> {
            let count = self.lure_count.load(Ordering::SeqCst);
            Ok((0..count).map(sample_deal).collect())
        }
    }

    pub fn runtime(source: Arc<FakeSource>) -> (FeedRuntime, mpsc::UnboundedReceiver<FeedUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FeedRuntime::new(source, tx), rx)
    }

    /// Wait for the next update, failing the test after a second.
    pub async fn next_update(rx: &mut mpsc::UnboundedReceiver<FeedUpdate>) -> FeedUpdate {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for a feed update")
            .expect("feed channel closed")
    }

    /// Assert nothing else arrives within a short window.
    pub async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<FeedUpdate>) {
        let extra = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(extra.is_err(), "unexpected extra update: {extra:?}");
    }
}
