//! Concurrent fan-out/fan-in of per-item fetches.
//!
//! [`Collector::collect`] takes a list of identifiers and an [`ItemFetcher`],
//! fetches every identifier concurrently on the tokio runtime, and returns
//! once every fetch has finished.  Failed fetches are logged and dropped;
//! they never abort the batch.
//!
//! ```text
//!               ┌─ unit(id 1) ─┐
//!  identifiers ─┼─ unit(id 2) ─┼─► mpsc ─► drain loop ─► ResultSet
//!               └─ unit(id n) ─┘    ▲
//!                     │ JoinSet     │ drops last sender
//!                     └──────► watcher
//! ```
//!
//! ## How completion is detected
//!
//! Every unit owns a clone of the channel sender and the watcher task owns
//! the original.  A unit's clone is released however the unit ends, and the
//! watcher releases its own only after joining every unit, so the drain loop
//! sees the channel close exactly when the last unit is done.  A fetch that
//! panics is caught inside its unit and costs only its own identifier.
//!
//! ## For contributors
//!
//! By default one task is spawned per identifier.  That is fine for the
//! tens of items a news source hands out; set
//! [`Collector::with_max_in_flight`] when feeding it larger lists.

use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use clap::ValueEnum;
use futures::FutureExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn, Instrument};

use crate::fetch::ItemFetcher;
use crate::source::{Render, RenderableItem};

/// Position of the identifier in the input list, plus what it rendered to.
type Arrival = (usize, RenderableItem);

/// Order of the items in a [`ResultSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CollectOrder {
    /// Whatever order the fetches happened to finish in.
    #[default]
    Arrival,
    /// Same order as the identifiers that were passed in.
    Input,
}

/// Successfully fetched items from one [`Collector::collect`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<RenderableItem>,
    failed: usize,
}

impl ResultSet {
    pub fn items(&self) -> &[RenderableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of identifiers that produced no item.
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn into_items(self) -> Vec<RenderableItem> {
        self.items
    }
}

impl IntoIterator for ResultSet {
    type Item = RenderableItem;
    type IntoIter = std::vec::IntoIter<RenderableItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// The fan-out/fan-in engine.
///
/// Cheap to copy; holds only policy, no per-batch state, so one value can
/// serve any number of concurrent `collect` calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collector {
    max_in_flight: Option<NonZeroUsize>,
    order: CollectOrder,
}

impl Collector {
    /// Unbounded fan-out, results in arrival order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of fetches running at once.  `None` means one task per
    /// identifier.
    pub fn with_max_in_flight(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_in_flight = limit;
        self
    }

    pub fn with_order(mut self, order: CollectOrder) -> Self {
        self.order = order;
        self
    }

    /// Fetch every identifier through `fetcher` and gather the successes.
    ///
    /// Returns only after every fetch has completed.  Must be called from
    /// within a tokio runtime.
    pub async fn collect<F: ItemFetcher>(&self, ids: Vec<F::Id>, fetcher: Arc<F>) -> ResultSet {
        let total = ids.len();
        if total == 0 {
            return ResultSet::default();
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let units = match self.max_in_flight {
            Some(limit) if limit.get() < total => spawn_workers(ids, fetcher, &tx, limit),
            _ => spawn_per_item(ids, fetcher, &tx),
        };
        debug!(total, units = units.len(), "fetches launched");

        let watcher = tokio::spawn(watch(units, tx).in_current_span());

        let mut arrivals: Vec<Arrival> = Vec::with_capacity(total);
        while let Some(arrival) = rx.recv().await {
            arrivals.push(arrival);
        }

        // The channel only closes once the watcher has let go of its sender,
        // so this join is immediate; it just surfaces a watcher panic.
        if let Err(error) = watcher.await {
            warn!(%error, "completion watcher failed");
        }

        if self.order == CollectOrder::Input {
            arrivals.sort_by_key(|(index, _)| *index);
        }

        let failed = total - arrivals.len();
        debug!(fetched = arrivals.len(), failed, "fetches finished");

        ResultSet {
            items: arrivals.into_iter().map(|(_, item)| item).collect(),
            failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Units of work
// ---------------------------------------------------------------------------

/// One task per identifier.
fn spawn_per_item<F: ItemFetcher>(
    ids: Vec<F::Id>,
    fetcher: Arc<F>,
    tx: &UnboundedSender<Arrival>,
) -> JoinSet<()> {
    let mut units = JoinSet::new();
    for (index, id) in ids.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let tx = tx.clone();
        units.spawn(
            async move { fetch_one(fetcher.as_ref(), index, id, &tx).await }.in_current_span(),
        );
    }
    units
}

/// `limit` workers pulling identifiers off a shared queue until it is empty.
fn spawn_workers<F: ItemFetcher>(
    ids: Vec<F::Id>,
    fetcher: Arc<F>,
    tx: &UnboundedSender<Arrival>,
    limit: NonZeroUsize,
) -> JoinSet<()> {
    let queue = Arc::new(Mutex::new(ids.into_iter().enumerate()));
    let mut units = JoinSet::new();
    for _ in 0..limit.get() {
        let queue = Arc::clone(&queue);
        let fetcher = Arc::clone(&fetcher);
        let tx = tx.clone();
        units.spawn(
            async move {
                while let Some((index, id)) = next_job(&queue) {
                    fetch_one(fetcher.as_ref(), index, id, &tx).await;
                }
            }
            .in_current_span(),
        );
    }
    units
}

/// The guard is released before returning, so it is never held across an
/// await point.
fn next_job<I: Iterator>(queue: &Mutex<I>) -> Option<I::Item> {
    queue.lock().unwrap_or_else(PoisonError::into_inner).next()
}

async fn fetch_one<F: ItemFetcher>(
    fetcher: &F,
    index: usize,
    id: F::Id,
    tx: &UnboundedSender<Arrival>,
) {
    // A panic is contained to this one identifier so that a pool worker
    // carries on with the rest of its queue.
    match AssertUnwindSafe(fetcher.fetch(&id)).catch_unwind().await {
        Ok(Ok(record)) => {
            // Only fails if the collecting future was dropped; nobody is
            // left to hand the item to.
            let _ = tx.send((index, record.render()));
        }
        Ok(Err(error)) => warn!(%id, %error, "dropping item"),
        Err(_) => warn!(%id, "fetch panicked, dropping item"),
    }
}

/// Join every unit, then drop `closer` so the drain loop sees end-of-stream.
async fn watch(mut units: JoinSet<()>, closer: UnboundedSender<Arrival>) {
    while let Some(joined) = units.join_next().await {
        if let Err(error) = joined {
            warn!(%error, "fetch task did not complete");
        }
    }
    drop(closer);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
