//! Hacker News Firebase API source.
//!
//! Two endpoints are used: `topstories.json` for the ranked identifier list
//! and `item/{id}.json` for each record.  The API answers `null` for ids it
//! does not know, which is reported as an error like any other failed fetch.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use super::{Item, ItemId, ItemSource};

/// Public base URL of the v0 API.
pub const HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// An [`ItemSource`] backed by the Hacker News API over HTTP.
pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
}

impl HnClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// `timeout` bounds every individual request; there is no retry.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ItemSource for HnClient {
    fn name(&self) -> &str {
        "Hacker News"
    }

    async fn top_ids(&self) -> Result<Vec<ItemId>> {
        let url = self.endpoint("topstories.json");
        let ids = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("GET {url} failed"))?
            .json::<Vec<ItemId>>()
            .await
            .context("Failed to decode top story ids")?;
        Ok(ids)
    }

    async fn item(&self, id: ItemId) -> Result<Item> {
        let url = self.endpoint(&format!("item/{id}.json"));
        let item = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("GET {url} failed"))?
            .json::<Option<Item>>()
            .await
            .with_context(|| format!("Failed to decode item {id}"))?;
        item.ok_or_else(|| anyhow!("item {id} not found"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
