//! sponge — soak up the day's top stories into one plain-text digest.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ ids  ┌───────────┐ RenderableItem ┌───────────┐
//! │  source/  │ ───► │ engine.rs │ ─────────────► │ report.rs │
//! │ (adapter) │      │ (fan-out) │   per section  │  (file)   │
//! └───────────┘      └───────────┘                └───────────┘
//!       ▲                  │ ItemFetcher::fetch
//!       │            ┌───────────┐
//!  config.rs         │ fetch.rs  │
//!                    └───────────┘
//! ```
//!
//! * **`config`** — clap flags and environment credentials.
//! * **`source/`** — the `DataSource` trait and one adapter per provider
//!   (Hacker News, Reddit, New York Times, RSS).
//! * **`fetch`** — the `ItemFetcher` trait and the shared HTTP helpers.
//! * **`engine`** — concurrent per-item fetching with failure isolation.
//! * **`report`** — writes labelled sections to a sink.
//! * **`digest`** — runs every source and writes the output file.

pub mod config;
pub mod digest;
pub mod engine;
pub mod fetch;
pub mod report;
pub mod source;
