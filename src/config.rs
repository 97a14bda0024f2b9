//! Command-line and environment configuration.
//!
//! Everything is parsed once in `main` and passed down by value; nothing
//! reads flags or environment variables after startup.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::engine::{CollectOrder, Collector};
use crate::source::{
    hacker_news, nyt, reddit, DataSource, HackerNewsSource, NytSource, RedditSource, RssSource,
};

/// Collect today's top stories from several news sources into one text file.
#[derive(Parser, Debug, Clone)]
#[command(name = "sponge", version, about)]
pub struct Config {
    /// Output file
    #[arg(long, default_value = "/tmp/sponge_out.txt")]
    pub out: PathBuf,

    /// Number of top items to keep per source
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    /// Per-request timeout, in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Cap on concurrent item fetches per source (default: one per item)
    #[arg(long, value_name = "N")]
    pub max_in_flight: Option<NonZeroUsize>,

    /// Order of items within a section
    #[arg(long, value_enum, default_value_t = CollectOrder::Arrival)]
    pub order: CollectOrder,

    /// Subreddit to include; repeat for more than one
    #[arg(long = "subreddit", value_name = "NAME", default_value = "golang")]
    pub subreddits: Vec<String>,

    /// RSS feed URL to include; repeat for more than one
    #[arg(long = "rss", value_name = "URL")]
    pub rss_feeds: Vec<String>,

    /// Reddit account named in the User-Agent; Reddit sections are empty without it
    #[arg(long, env = reddit::USERNAME_VAR, hide_env_values = true)]
    pub reddit_username: Option<String>,

    /// New York Times Top Stories API key; the NYT section is empty without it
    #[arg(long, env = nyt::API_KEY_VAR, hide_env_values = true)]
    pub nyt_api_key: Option<String>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client shared by every source; each request gets
    /// [`timeout`](Self::timeout).
    pub fn client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.timeout()).build()
    }

    pub fn collector(&self) -> Collector {
        Collector::new()
            .with_max_in_flight(self.max_in_flight)
            .with_order(self.order)
    }

    /// Sources in report order: New York Times, Hacker News, each subreddit,
    /// then each RSS feed.
    pub fn sources(&self) -> Vec<Box<dyn DataSource>> {
        let mut sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(NytSource::new(nyt::DEFAULT_BASE_URL, self.nyt_api_key.clone())),
            Box::new(HackerNewsSource::new(hacker_news::DEFAULT_BASE_URL)),
        ];
        for subreddit in &self.subreddits {
            sources.push(Box::new(RedditSource::new(
                reddit::DEFAULT_BASE_URL,
                subreddit,
                self.reddit_username.clone(),
            )));
        }
        for url in &self.rss_feeds {
            sources.push(Box::new(RssSource::new(url, RssSource::label_for(url))));
        }
        sources
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
