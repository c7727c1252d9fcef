//! The item types shared across all sources.
//!
//! [`Item`] is the raw record as the remote service describes it.  A
//! [`Story`] wraps an item together with fields derived once at resolution
//! time (currently only the display host), so renderers never re-parse URLs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ItemId;

/// The only item kind that counts toward a page of stories.
pub const TARGET_KIND: &str = "story";

/// A single record from the item service.
///
/// Every field except `id` is optional on the wire; missing values decode to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct Item {
    pub id: ItemId,

    /// `story`, `comment`, `job`, `poll` or `pollopt`.
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub by: String,

    #[serde(default)]
    pub title: String,

    /// External link.  Text posts (Ask HN etc.) have none.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub score: i64,

    /// Total comment count.
    #[serde(default)]
    pub descendants: i64,

    #[serde(default)]
    pub kids: Vec<ItemId>,

    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub dead: bool,

    #[serde(default)]
    pub deleted: bool,
}

/// An item plus its derived display host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub item: Item,
    /// Host of `item.url` without a leading `www.`; empty when there is no
    /// parseable link.
    pub host: String,
}

impl Story {
    pub fn from_item(item: Item) -> Self {
        let host = item.url.as_deref().map(normalize_host).unwrap_or_default();
        Self { item, host }
    }

    /// Link to the discussion page on Hacker News.
    pub fn comments_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.item.id)
    }
}

/// Extract the host of `link`, dropping a leading `www.`.
///
/// Returns an empty string when `link` is not an absolute URL with a host.
pub fn normalize_host(link: &str) -> String {
    reqwest::Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .map(|host| match host.strip_prefix("www.") {
            Some(rest) => rest.to_owned(),
            None => host,
        })
        .unwrap_or_default()
}

/// Whether `item` counts toward the requested number of stories.
pub fn qualifies(item: &Item) -> bool {
    item.kind == TARGET_KIND && item.url.as_deref().is_some_and(|url| !url.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
