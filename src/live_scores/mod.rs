pub mod api_football;
pub mod mock;
pub mod provider;

#[cfg(test)]
pub mod fake;

pub use api_football::ApiFootball;
pub use mock::MockFixtureSet;
pub use provider::ScoreProvider;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ScoreCache;
use crate::error::FetchResult;
use crate::models::{timestamp_now, Snapshot};

/// Where the refresh loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Waiting for the next tick
    Idle,
    /// Provider call in flight
    Fetching,
}

/// Periodically pulls live matches from a provider and publishes them to the cache.
///
/// A failed fetch is logged and leaves the cache alone, so readers keep
/// seeing the previous snapshot until the next successful tick. There is no
/// backoff and no retry inside a tick.
#[derive(Clone)]
pub struct Refresher {
    provider: Arc<dyn ScoreProvider>,
    cache: ScoreCache,
    interval: Duration,
    fetching: Arc<AtomicBool>,
}

impl Refresher {
    pub fn new(provider: Arc<dyn ScoreProvider>, cache: ScoreCache, interval: Duration) -> Self {
        Refresher {
            provider,
            cache,
            interval,
            fetching: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> RefreshState {
        if self.fetching.load(Ordering::SeqCst) {
            RefreshState::Fetching
        } else {
            RefreshState::Idle
        }
    }

    /// Run a single Idle → Fetching → Idle cycle. Returns the number of
    /// matches published.
    pub async fn refresh_once(&self) -> FetchResult<usize> {
        self.fetching.store(true, Ordering::SeqCst);
        let ticket = self.cache.ticket();
        let started = timestamp_now();
        let result = self.provider.fetch_live_matches().await;

        let outcome = match result {
            Ok(matches) => {
                let count = matches.len();
                let first = !self.cache.is_populated().await;
                let snapshot = Snapshot::taken_at(started, matches);
                if self.cache.publish(ticket, snapshot).await {
                    if first {
                        info!("{}: first live snapshot published", self.provider.name());
                    }
                    info!("{}: published {} live matches", self.provider.name(), count);
                } else {
                    debug!(
                        "{}: newer snapshot already published, dropped {} matches",
                        self.provider.name(),
                        count
                    );
                }
                Ok(count)
            }
            Err(e) => {
                warn!(
                    "{}: fetch failed, keeping previous snapshot: {}",
                    self.provider.name(),
                    e
                );
                Err(e)
            }
        };

        self.fetching.store(false, Ordering::SeqCst);
        outcome
    }

    /// Spawn the refresh loop. The first fetch happens immediately; the loop
    /// exits once `true` is sent on `shutdown` (or the sender is dropped).
    /// An in-flight fetch is allowed to finish before the signal is observed.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Refresher started (provider={}, interval={:?})",
                self.provider.name(),
                self.interval
            );

            let mut interval = tokio::time::interval(self.interval);
            // Ticks that elapse during a slow fetch are dropped, never queued
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // A clone of this refresher may still be mid-fetch
                        if self.state() == RefreshState::Fetching {
                            debug!("Refresher: fetch already in flight, skipping tick");
                            continue;
                        }
                        info!("Updating scores...");
                        // Failures were already logged in refresh_once
                        let _ = self.refresh_once().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Refresher stopped");
        })
    }
}
