//! Fetch every configured source and write the digest file.
//!
//! Sources run concurrently with each other; inside a source, per-item
//! fetches run concurrently through the engine.  A source that fails, or
//! lacks its credential, gets an empty section.  Only failing to create or
//! write the output file is an error.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{info_span, warn, Instrument};

use crate::report::ReportWriter;
use crate::source::{DataSource, RenderableItem, SourceContext, SourceError};

/// Fetch every source and write one section per source to `out`.
///
/// The file is created before any network traffic so that an unwritable
/// path fails fast.  Returns the total number of items written.
pub async fn write_digest(
    out: &Path,
    sources: &[Box<dyn DataSource>],
    ctx: &SourceContext,
) -> Result<usize> {
    let file = File::create(out)
        .with_context(|| format!("failed to create output file {}", out.display()))?;

    let sections = gather(sources, ctx).await;

    let mut writer = ReportWriter::new(BufWriter::new(file));
    let mut total = 0;
    for (source, items) in sources.iter().zip(&sections) {
        total += writer
            .write_section(source.name(), items)
            .with_context(|| format!("failed to write {} section", source.name()))?;
    }
    writer
        .finish()
        .with_context(|| format!("failed to flush {}", out.display()))?;

    Ok(total)
}

/// Fetch all sources concurrently.  The result lines up with `sources`; a
/// source that failed contributes an empty list.
pub async fn gather(
    sources: &[Box<dyn DataSource>],
    ctx: &SourceContext,
) -> Vec<Vec<RenderableItem>> {
    join_all(sources.iter().map(|source| {
        let span = info_span!("source", name = source.name());
        async move {
            match source.fetch(ctx).await {
                Ok(items) => items,
                Err(SourceError::MissingCredential { var }) => {
                    warn!("{var} not set, skipping");
                    Vec::new()
                }
                Err(error) => {
                    warn!(%error, "source failed");
                    Vec::new()
                }
            }
        }
        .instrument(span)
    }))
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
