//! Answers "what are the scores right now?" for the HTTP layer.
//!
//! Depending on the fetch mode, the current snapshot comes from the cache the
//! refresher keeps warm, from a fetch made for this request, or from the mock
//! dataset when neither produced any matches. Upstream failures never reach
//! the caller; they only change which of those sources is used.

use clap::ValueEnum;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::ScoreCache;
use crate::live_scores::{MockFixtureSet, ScoreProvider};
use crate::models::{timestamp_now, Snapshot};

/// When live data is pulled from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FetchMode {
    /// Background refresher only; requests read the cache
    #[default]
    Background,
    /// Fetch inside every request, no background task
    OnDemand,
    /// Background refresher plus a fetch inside every request
    Both,
}

impl FetchMode {
    pub fn runs_refresher(self) -> bool {
        matches!(self, FetchMode::Background | FetchMode::Both)
    }

    pub fn fetches_per_request(self) -> bool {
        matches!(self, FetchMode::OnDemand | FetchMode::Both)
    }
}

#[derive(Clone)]
pub struct ScoreService {
    cache: ScoreCache,
    /// `None` means no API key: mock-only mode
    provider: Option<Arc<dyn ScoreProvider>>,
    mode: FetchMode,
    mock_set: MockFixtureSet,
    mock_fallback: bool,
}

impl ScoreService {
    pub fn new(
        cache: ScoreCache,
        provider: Option<Arc<dyn ScoreProvider>>,
        mode: FetchMode,
        mock_set: MockFixtureSet,
        mock_fallback: bool,
    ) -> Self {
        ScoreService {
            cache,
            provider,
            mode,
            mock_set,
            mock_fallback,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    /// Current snapshot, falling back to mock data when there is nothing live to show.
    pub async fn get_scores(&self) -> Snapshot {
        if let Some(provider) = &self.provider {
            if self.mode.fetches_per_request() {
                // Order and stamp the write by when the fetch started, so a slow
                // request cannot overwrite what a later one already published
                let ticket = self.cache.ticket();
                let started = timestamp_now();
                match provider.fetch_live_matches().await {
                    Ok(matches) => {
                        let count = matches.len();
                        let stored = self
                            .cache
                            .publish(ticket, Snapshot::taken_at(started, matches))
                            .await;
                        debug!(
                            "{}: on-demand fetch returned {} matches (stored={})",
                            provider.name(),
                            count,
                            stored
                        );
                    }
                    Err(e) => warn!("{}: on-demand fetch failed: {}", provider.name(), e),
                }
            }
        }

        let cached = self.cache.read().await;
        if self.provider.is_some() && !cached.is_empty() {
            return (*cached).clone();
        }

        if self.mock_fallback {
            debug!("Serving mock scores ({:?})", self.mock_set);
            return self.get_mock_scores();
        }

        (*cached).clone()
    }

    /// The fixed sample dataset, stamped with the current time.
    pub fn get_mock_scores(&self) -> Snapshot {
        self.mock_set.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FetchResult};
    use crate::live_scores::fake::{live_match, ScriptedProvider};
    use crate::models::Match;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn service(
        cache: &ScoreCache,
        provider: Option<Arc<ScriptedProvider>>,
        mode: FetchMode,
        mock_fallback: bool,
    ) -> ScoreService {
        ScoreService::new(
            cache.clone(),
            provider.map(|p| p as Arc<dyn ScoreProvider>),
            mode,
            MockFixtureSet::Full,
            mock_fallback,
        )
    }

    fn team_names(matches: &[Match]) -> Vec<&str> {
        matches.iter().map(|m| m.home_team.as_str()).collect()
    }

    #[test]
    fn test_fetch_mode_flags() {
        assert!(FetchMode::Background.runs_refresher());
        assert!(!FetchMode::Background.fetches_per_request());
        assert!(!FetchMode::OnDemand.runs_refresher());
        assert!(FetchMode::OnDemand.fetches_per_request());
        assert!(FetchMode::Both.runs_refresher());
        assert!(FetchMode::Both.fetches_per_request());
    }

    #[tokio::test]
    async fn test_no_credential_serves_mock_even_if_cache_has_data() {
        let cache = ScoreCache::new();
        cache.replace(Snapshot::now(vec![live_match(9, "Ajax", "PSV")])).await;
        let svc = service(&cache, None, FetchMode::OnDemand, true);

        let snap = svc.get_scores().await;
        assert_eq!(snap.matches, MockFixtureSet::Full.matches());
        assert!(snap.last_updated.is_some());
        assert!(!svc.has_credential());
    }

    #[tokio::test]
    async fn test_on_demand_fetch_success_is_served_and_cached() {
        let cache = ScoreCache::new();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(vec![live_match(9, "Ajax", "PSV")])]));
        let svc = service(&cache, Some(provider.clone()), FetchMode::OnDemand, true);

        let snap = svc.get_scores().await;
        assert_eq!(team_names(&snap.matches), vec!["Ajax"]);
        assert_eq!(provider.calls(), 1);
        assert_eq!(cache.read().await.matches[0].id, 9);
    }

    #[tokio::test]
    async fn test_on_demand_failure_serves_previous_snapshot() {
        let cache = ScoreCache::new();
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(vec![live_match(9, "Ajax", "PSV")]),
            Err(FetchError::BadStatus(401)),
        ]));
        let svc = service(&cache, Some(provider), FetchMode::OnDemand, true);

        let first = svc.get_scores().await;
        let second = svc.get_scores().await;
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_on_demand_failure_with_empty_cache_serves_mock() {
        let cache = ScoreCache::new();
        let provider = Arc::new(ScriptedProvider::new(vec![Err(FetchError::BadStatus(401))]));
        let svc = service(&cache, Some(provider), FetchMode::OnDemand, true);

        let snap = svc.get_scores().await;
        assert_eq!(snap.matches.len(), 5);
        assert_eq!(snap.matches[1].home_team, "Barcelona");
    }

    #[tokio::test]
    async fn test_zero_live_matches_falls_back_to_mock() {
        let cache = ScoreCache::new();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(vec![])]));
        let svc = service(&cache, Some(provider), FetchMode::OnDemand, true);

        assert_eq!(svc.get_scores().await.matches.len(), 5);
        // The empty live snapshot is still what the cache holds
        let cached = cache.read().await;
        assert!(cached.matches.is_empty());
        assert!(cached.last_updated.is_some());
    }

    /// First call is slow and returns the older data; later calls answer at once.
    struct SlowFirstProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScoreProvider for SlowFirstProvider {
        fn name(&self) -> &str {
            "slow-first"
        }

        async fn fetch_live_matches(&self) -> FetchResult<Vec<Match>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(vec![live_match(1, "Old", "Away")])
            } else {
                Ok(vec![live_match(2, "New", "Away")])
            }
        }
    }

    #[tokio::test]
    async fn test_overlapping_requests_keep_newest_fetch() {
        let cache = ScoreCache::new();
        let provider: Arc<dyn ScoreProvider> = Arc::new(SlowFirstProvider {
            calls: AtomicUsize::new(0),
        });
        let svc = ScoreService::new(
            cache.clone(),
            Some(provider),
            FetchMode::OnDemand,
            MockFixtureSet::Full,
            true,
        );

        let slow_request = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.get_scores().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fast = svc.get_scores().await;
        assert_eq!(team_names(&fast.matches), vec!["New"]);

        let slow = slow_request.await.unwrap();
        assert_eq!(team_names(&slow.matches), vec!["New"]);
        assert_eq!(team_names(&cache.read().await.matches), vec!["New"]);
    }

    #[tokio::test]
    async fn test_on_demand_snapshot_stamped_when_fetch_started() {
        let cache = ScoreCache::new();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(vec![live_match(9, "Ajax", "PSV")])]));
        let svc = service(&cache, Some(provider), FetchMode::OnDemand, true);

        let before = timestamp_now();
        let snap = svc.get_scores().await;
        let after = timestamp_now();

        let stamped = snap.last_updated.unwrap();
        assert!(before <= stamped && stamped <= after);
    }

    #[tokio::test]
    async fn test_background_mode_never_fetches_per_request() {
        let cache = ScoreCache::new();
        cache.replace(Snapshot::now(vec![live_match(3, "Feyenoord", "AZ")])).await;
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let svc = service(&cache, Some(provider.clone()), FetchMode::Background, true);

        let snap = svc.get_scores().await;
        assert_eq!(team_names(&snap.matches), vec!["Feyenoord"]);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_without_mock_fallback_empty_cache_is_served_as_is() {
        let cache = ScoreCache::new();
        let svc = service(&cache, None, FetchMode::Background, false);

        assert_eq!(svc.get_scores().await, Snapshot::default());
    }

    #[tokio::test]
    async fn test_mock_scores_stable_with_non_decreasing_timestamps() {
        let svc = service(&ScoreCache::new(), None, FetchMode::Background, true);

        let mut previous = String::new();
        for _ in 0..5 {
            let snap = svc.get_mock_scores();
            assert_eq!(
                team_names(&snap.matches),
                vec!["Manchester United", "Barcelona", "Bayern Munich", "Paris Saint-Germain", "AC Milan"]
            );
            // Fixed-width "YYYY-MM-DD HH:MM:SS" orders lexically
            let ts = snap.last_updated.unwrap();
            assert!(ts >= previous);
            previous = ts;
        }
    }

    #[tokio::test]
    async fn test_compact_mock_set() {
        let svc = ScoreService::new(ScoreCache::new(), None, FetchMode::Background, MockFixtureSet::Compact, true);
        assert_eq!(svc.get_scores().await.matches.len(), 3);
    }
}
