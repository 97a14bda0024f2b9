use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sponge::config::Config;
use sponge::digest::write_digest;
use sponge::source::SourceContext;

#[tokio::main]
async fn main() -> Result<()> {
    // -- logging ---------------------------------------------------------------
    // Diagnostics go to stderr; override the level with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sponge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // -- parse arguments -------------------------------------------------------
    let config = Config::parse();

    // -- shared fetch context --------------------------------------------------
    let client = config.client().context("failed to build HTTP client")?;
    let ctx = SourceContext {
        client,
        collector: config.collector(),
        count: config.count,
    };

    // -- fetch and write -------------------------------------------------------
    let written = write_digest(&config.out, &config.sources(), &ctx).await?;
    info!(items = written, "Done writing output to {}", config.out.display());
    Ok(())
}
