use async_trait::async_trait;

use crate::error::FetchResult;
use crate::models::Match;

/// Trait that every live-score provider must implement.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    /// Return all currently live matches, in provider order.
    async fn fetch_live_matches(&self) -> FetchResult<Vec<Match>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
