//! Top posts of the day from one subreddit.
//!
//! Reddit throttles anonymous clients that send a generic user agent (HTTP
//! 429), so the source refuses to run without `REDDIT_USERNAME` and puts it
//! in the `User-Agent` header as Reddit's API rules ask.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

use super::{take_top, trim_base, DataSource, Render, RenderableItem, SourceContext, SourceError};
use crate::fetch;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Environment variable holding the Reddit account the requests are made for.
pub const USERNAME_VAR: &str = "REDDIT_USERNAME";

/// One post from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedditPost {
    pub title: String,
    pub url: String,
}

impl Render for RedditPost {
    fn render(&self) -> RenderableItem {
        RenderableItem::new(&self.title, &self.url)
    }
}

/// `{"data": {"children": [{"data": <post>}, ...]}}`
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

#[derive(Debug, Clone)]
pub struct RedditSource {
    base_url: String,
    subreddit: String,
    username: Option<String>,
    label: String,
}

impl RedditSource {
    /// # Arguments
    ///
    /// * `base_url` — scheme and host, e.g. [`DEFAULT_BASE_URL`].
    /// * `subreddit` — name without the `r/` prefix.
    /// * `username` — value of [`USERNAME_VAR`], if set.
    pub fn new(
        base_url: impl Into<String>,
        subreddit: impl Into<String>,
        username: Option<String>,
    ) -> Self {
        let subreddit = subreddit.into();
        Self {
            base_url: trim_base(base_url),
            label: format!("Reddit {subreddit}"),
            subreddit,
            username: username.filter(|name| !name.is_empty()),
        }
    }
}

#[async_trait]
impl DataSource for RedditSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError> {
        let username = self
            .username
            .as_deref()
            .ok_or(SourceError::MissingCredential { var: USERNAME_VAR })?;
        let user_agent = format!(
            "rust:{}:{} (by /u/{username})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );

        let url = format!("{}/r/{}/top.json", self.base_url, self.subreddit);
        let limit = ctx.count.to_string();
        let request = ctx
            .client
            .get(url)
            .query(&[("raw_json", "1"), ("t", "day"), ("limit", limit.as_str())])
            .header(USER_AGENT, user_agent);

        let listing: Listing = fetch::get_json(request).await?;
        debug!(source = self.name(), posts = listing.data.children.len(), "listing received");

        let posts = take_top(listing.data.children, ctx.count, self.name());
        Ok(posts.iter().map(|child| child.data.render()).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
