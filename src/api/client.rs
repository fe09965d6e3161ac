//! HTTP implementation of [`DealSource`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{DealSource, FeedKey, TransportError};
use crate::core::deal::{Deal, DealPage};

pub const DEFAULT_BASE_URL: &str = "https://assignment-front.ilevit.com";

/// Thin wrapper around a shared `reqwest::Client`.  Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpDealSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDealSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Endpoint path and query string for one page of `feed`.
fn page_endpoint(feed: FeedKey, page: u32) -> (&'static str, Vec<(&'static str, String)>) {
    match feed {
        FeedKey::TimeDeals(slot) => (
            "/deals/time-deal",
            vec![("time", slot.as_query().to_string()), ("page", page.to_string())],
        ),
        FeedKey::BrandDeals => ("/deals/brand-deal", vec![("page", page.to_string())]),
    }
}

#[async_trait]
impl DealSource for HttpDealSource {
    async fn fetch_page(&self, feed: FeedKey, page: u32) -> Result<DealPage, TransportError> {
        let (path, query) = page_endpoint(feed, page);
        self.get_json(path, &query).await
    }

    async fn fetch_lure_deals(&self) -> Result<Vec<Deal>, TransportError> {
        self.get_json("/deals/lure-deal", &[]).await
    }
}
