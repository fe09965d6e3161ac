//! Remote deal catalog: the fetch capability consumed by the feed
//! controllers, plus its HTTP implementation.

pub mod client;
pub mod error;

pub use client::HttpDealSource;
pub use error::TransportError;

use async_trait::async_trait;

use crate::core::deal::{Deal, DealPage};

/// Which time window a time-deal listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeSlot {
    #[default]
    Current,
    Next,
}

impl TimeSlot {
    /// Value of the `time` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            TimeSlot::Current => "current",
            TimeSlot::Next => "next",
        }
    }
}

/// A paginated listing the service can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKey {
    TimeDeals(TimeSlot),
    BrandDeals,
}

/// Anything that can hand out deal pages.  The HTTP client is the production
/// implementation; tests use in-memory fakes.
#[async_trait]
pub trait DealSource: Send + Sync {
    async fn fetch_page(&self, feed: FeedKey, page: u32) -> Result<DealPage, TransportError>;

    /// The short, non-paginated "lure" list shown on the home screen.
    async fn fetch_lure_deals(&self) -> Result<Vec<Deal>, TransportError>;
}
