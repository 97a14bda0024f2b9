//! Hacker News front page.
//!
//! The list endpoint (`/v0/topstories.json`) returns only ids, roughly 500 of
//! them, so every kept id costs a second request to `/v0/item/{id}.json`.
//! Those requests go through the fan-out engine.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{take_top, trim_base, DataSource, Render, RenderableItem, SourceContext, SourceError};
use crate::fetch::{self, FetchError, ItemFetcher};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com";

/// One story as returned by the item endpoint.
///
/// Text posts (Ask HN and friends) have no `url`; those are dropped by the
/// fetcher because the report has nothing to link to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HackerNewsItem {
    #[serde(default)]
    pub title: String,
    pub url: Option<String>,
}

impl Render for HackerNewsItem {
    fn render(&self) -> RenderableItem {
        RenderableItem::new(&self.title, self.url.as_deref().unwrap_or_default())
    }
}

/// Looks up one story by id.
#[derive(Debug, Clone)]
pub struct ItemClient {
    client: reqwest::Client,
    base_url: String,
}

impl ItemClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl ItemFetcher for ItemClient {
    type Id = u64;
    type Record = HackerNewsItem;

    async fn fetch(&self, id: &u64) -> Result<HackerNewsItem, FetchError> {
        let url = format!("{}/v0/item/{id}.json", self.base_url);
        let item: HackerNewsItem = fetch::get_json(self.client.get(url)).await?;
        match item.url {
            Some(_) => Ok(item),
            None => Err(FetchError::Incomplete { field: "url" }),
        }
    }
}

/// The Hacker News top stories source.
#[derive(Debug, Clone)]
pub struct HackerNewsSource {
    base_url: String,
}

impl HackerNewsSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url),
        }
    }
}

impl Default for HackerNewsSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl DataSource for HackerNewsSource {
    fn name(&self) -> &str {
        "Hacker News"
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError> {
        let list_url = format!("{}/v0/topstories.json", self.base_url);
        let ids: Vec<u64> = fetch::get_json(ctx.client.get(list_url)).await?;
        let ids = take_top(ids, ctx.count, self.name());

        let items = Arc::new(ItemClient::new(ctx.client.clone(), &self.base_url));
        let results = ctx.collector.collect(ids, items).await;
        if results.failed() > 0 {
            info!(
                source = self.name(),
                fetched = results.len(),
                failed = results.failed(),
                "some stories were skipped"
            );
        }
        Ok(results.into_items())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
