//! RSS feed source.
//!
//! A feed already carries titles and links, so one request per run is
//! enough.  Any number of feeds can be configured with `--rss`; each one
//! becomes its own report section.

use async_trait::async_trait;
use tracing::debug;

use super::{take_top, DataSource, RenderableItem, SourceContext, SourceError};
use crate::fetch;

/// An RSS 2.0 feed fetched over HTTP and parsed with the [`rss`](::rss) crate.
#[derive(Debug, Clone)]
pub struct RssSource {
    /// The feed URL.
    pub url: String,
    /// Heading for this feed's section in the report.
    pub label: String,
}

impl RssSource {
    /// # Arguments
    ///
    /// * `url` — full URL of the RSS feed (e.g.
    ///   `https://feeds.bbci.co.uk/news/rss.xml`).
    /// * `label` — section heading for items from this feed.
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Default section heading for a feed: `RSS <host>`, or the raw URL when
    /// it does not parse.
    pub fn label_for(url: &str) -> String {
        let host = reqwest::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(String::from));
        format!("RSS {}", host.as_deref().unwrap_or(url))
    }

    /// Turn an already-parsed channel into items.
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// parsing logic without hitting the network.  Entries without a
    /// `<link>` are skipped since the report has nothing to point at.
    pub fn parse_channel(channel: &::rss::Channel) -> Vec<RenderableItem> {
        channel
            .items()
            .iter()
            .filter_map(|item| {
                let link = item.link()?;
                Some(RenderableItem::new(item.title().unwrap_or("(untitled)"), link))
            })
            .collect()
    }
}

#[async_trait]
impl DataSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError> {
        let body = fetch::get_bytes(ctx.client.get(&self.url)).await?;
        let channel = ::rss::Channel::read_from(body.as_slice())?;

        let items = Self::parse_channel(&channel);
        debug!(
            source = self.name(),
            entries = channel.items().len(),
            usable = items.len(),
            "feed parsed"
        );
        Ok(take_top(items, ctx.count, self.name()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
