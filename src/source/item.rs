//! The core data type shared across all news sources.
//!
//! `RenderableItem` is a single headline from any source (Hacker News, Reddit,
//! an RSS feed, ...).  Every source converts its native record into
//! `RenderableItem`s through the [`Render`] trait so that the engine and the
//! report writer stay source-agnostic.
//!
//! ## For contributors
//!
//! If you are adding a new source you do **not** need to modify this file.
//! Implement [`Render`] for your source's decoded record type and the rest
//! of the pipeline picks it up.

use std::fmt;

/// A single headline, normalised from any source.
///
/// Immutable once created: the fields are private and only readable through
/// accessors.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RenderableItem {
    title: String,
    url: String,
}

impl RenderableItem {
    /// Build an item from a title and the link it points at.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Report text for one item: a `Title:` line followed by a `Url:` line.
impl fmt::Display for RenderableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title: {}\nUrl: {}", self.title, self.url)
    }
}

/// Projection from a source's decoded record into a [`RenderableItem`].
///
/// Implementations must be pure: rendering the same record twice yields
/// identical items.
pub trait Render {
    fn render(&self) -> RenderableItem;
}

impl Render for RenderableItem {
    fn render(&self) -> RenderableItem {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
