//! In-memory snapshot cache shared between the refresher and HTTP handlers.
//!
//! Writers (the refresher, and request handlers in on-demand mode) take a
//! ticket before they start fetching and publish with it afterwards. Tickets
//! are issued in increasing order and a publish whose ticket is older than
//! the stored one is dropped, so a slow fetch can never overwrite data from a
//! fetch that started after it. The stored value is an `Arc<Snapshot>`: a
//! write only swaps a pointer under the lock and readers walk away with an
//! immutable snapshot they can serialize without holding anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::Snapshot;

/// Fetch-start order of a write. Issued by [`ScoreCache::ticket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Default)]
struct Published {
    /// Ticket of the stored snapshot, 0 before the first publish
    generation: u64,
    snapshot: Arc<Snapshot>,
}

/// Thread-safe holder of the latest published snapshot.
#[derive(Clone, Default)]
pub struct ScoreCache {
    inner: Arc<RwLock<Published>>,
    next_ticket: Arc<AtomicU64>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a place in publish order. Call before starting the fetch.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish `snapshot` unless a write that started later already landed.
    /// Returns whether the snapshot was stored.
    pub async fn publish(&self, ticket: Ticket, snapshot: Snapshot) -> bool {
        let next = Arc::new(snapshot);
        let count = next.matches.len();
        {
            let mut current = self.inner.write().await;
            if ticket.0 <= current.generation {
                debug!(
                    "ScoreCache: dropped stale snapshot (ticket {} <= {})",
                    ticket.0, current.generation
                );
                return false;
            }
            current.generation = ticket.0;
            current.snapshot = next;
        }
        debug!("ScoreCache: published {} matches", count);
        true
    }

    /// Publish a new snapshot now, discarding the previous one in full.
    pub async fn replace(&self, snapshot: Snapshot) {
        let ticket = self.ticket();
        self.publish(ticket, snapshot).await;
    }

    /// Current snapshot. Never a mix of two writes.
    pub async fn read(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.read().await.snapshot)
    }

    /// True once at least one successful fetch has been published.
    pub async fn is_populated(&self) -> bool {
        self.inner.read().await.snapshot.last_updated.is_some()
    }
}
