//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the common
//! [`RenderableItem`] type.  Concrete sources live in sub-modules:
//!
//! * [`hacker_news`] — list of ids, details fetched concurrently through the
//!   engine.
//! * [`reddit`], [`nyt`], [`rss`] — the list endpoint already carries titles
//!   and links, so no per-item fetch is needed.
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lobsters.rs`).
//! 2. Define a struct holding the source's base URL and any credentials, and
//!    implement [`DataSource`] for it.
//! 3. If items need a second request each, implement
//!    [`ItemFetcher`](crate::fetch::ItemFetcher) and hand the ids to
//!    [`SourceContext::collector`] like [`hacker_news`] does.
//! 4. Add `mod` and `pub use` lines below and construct it in
//!    [`Config::sources`](crate::config::Config::sources).
//!
//! The engine, the report writer and error reporting are all source-agnostic.

pub mod hacker_news;
mod item;
pub mod nyt;
pub mod reddit;
pub mod rss;

pub use hacker_news::HackerNewsSource;
pub use item::{Render, RenderableItem};
pub use nyt::NytSource;
pub use reddit::RedditSource;
pub use rss::RssSource;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::engine::Collector;
use crate::fetch::FetchError;

/// Why a whole source produced no items.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A credential the source needs is not set.
    #[error("environment variable {var} is not set")]
    MissingCredential { var: &'static str },

    /// The list endpoint could not be fetched or decoded.
    #[error(transparent)]
    List(#[from] FetchError),

    /// The list endpoint returned something that is not a valid feed.
    #[error("invalid feed: {0}")]
    Feed(#[from] ::rss::Error),
}

/// Everything a source needs from the run besides its own settings.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Shared HTTP client; carries the per-request timeout.
    pub client: reqwest::Client,
    /// Engine used by sources that fetch items one by one.
    pub collector: Collector,
    /// How many top entries of each list to keep.
    pub count: usize,
}

/// Trait that every news source must implement.
///
/// Sources are fetched concurrently with each other, so implementations must
/// be [`Send`] + [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { base_url: String }
///
/// #[async_trait]
/// impl DataSource for MySource {
///     fn name(&self) -> &str { "My Source" }
///
///     async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError> {
///         let list: MyList = fetch::get_json(ctx.client.get(&self.base_url)).await?;
///         Ok(take_top(list.items, ctx.count, self.name()).iter().map(Render::render).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Heading used for this source's section in the report.
    fn name(&self) -> &str;

    /// Fetch the current top items.
    ///
    /// Per-item failures are absorbed inside; an `Err` means the source as a
    /// whole has nothing to contribute this run.
    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError>;
}

/// Keep the first `count` entries of a ranked list.
///
/// Lists shorter than `count` are kept whole rather than treated as an error.
pub fn take_top<T>(mut list: Vec<T>, count: usize, source: &str) -> Vec<T> {
    if list.len() < count {
        debug!(source, available = list.len(), requested = count, "list shorter than requested");
    }
    list.truncate(count);
    list
}

/// Strip trailing slashes so `"{base}/path"` never doubles up.
pub(crate) fn trim_base(base_url: impl Into<String>) -> String {
    let mut base = base_url.into();
    while base.ends_with('/') {
        base.pop();
    }
    base
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
