//! New York Times home page top stories.

use async_trait::async_trait;
use serde::Deserialize;

use super::{take_top, trim_base, DataSource, Render, RenderableItem, SourceContext, SourceError};
use crate::fetch;

pub const DEFAULT_BASE_URL: &str = "https://api.nytimes.com";

/// Environment variable holding the Top Stories API key.
pub const API_KEY_VAR: &str = "NYT_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NytStory {
    pub title: String,
    pub url: String,
}

impl Render for NytStory {
    fn render(&self) -> RenderableItem {
        RenderableItem::new(&self.title, &self.url)
    }
}

#[derive(Debug, Deserialize)]
struct TopStories {
    results: Vec<NytStory>,
}

#[derive(Debug, Clone)]
pub struct NytSource {
    base_url: String,
    api_key: Option<String>,
}

impl NytSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: trim_base(base_url),
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }
}

#[async_trait]
impl DataSource for NytSource {
    fn name(&self) -> &str {
        "New York Times"
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<RenderableItem>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential { var: API_KEY_VAR })?;

        let url = format!("{}/svc/topstories/v2/home.json", self.base_url);
        let request = ctx.client.get(url).query(&[("api-key", api_key)]);
        let top: TopStories = fetch::get_json(request).await?;

        let stories = take_top(top.results, ctx.count, self.name());
        Ok(stories.iter().map(Render::render).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
