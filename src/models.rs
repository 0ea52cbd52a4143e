use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format used in `last_updated` (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One live (or recently observed) fixture as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Upstream fixture ID
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    /// `None` until the fixture has kicked off
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    /// Minutes played
    pub elapsed: Option<u32>,
    pub league: String,
    pub country: String,
}

/// The full set of matches plus the time it was produced, published as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated: Option<String>,
    pub matches: Vec<Match>,
}

impl Snapshot {
    /// Build a snapshot stamped with the current local time.
    pub fn now(matches: Vec<Match>) -> Self {
        Self::taken_at(timestamp_now(), matches)
    }

    /// Build a snapshot stamped with a timestamp captured earlier, e.g. when
    /// the fetch that produced `matches` started.
    pub fn taken_at(timestamp: String, matches: Vec<Match>) -> Self {
        Snapshot {
            last_updated: Some(timestamp),
            matches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
