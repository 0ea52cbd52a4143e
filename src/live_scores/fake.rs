//! Scripted in-process provider for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::provider::ScoreProvider;
use crate::error::{FetchError, FetchResult};
use crate::models::Match;

/// Returns queued results in order; once the queue is drained every call
/// fails with `BadStatus(503)`.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<FetchResult<Vec<Match>>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<FetchResult<Vec<Match>>>) -> Self {
        ScriptedProvider {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_live_matches(&self) -> FetchResult<Vec<Match>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::BadStatus(503)))
    }
}

pub fn live_match(id: i64, home: &str, away: &str) -> Match {
    Match {
        id,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score: Some(1),
        away_score: Some(0),
        elapsed: Some(55),
        league: "Eredivisie".to_string(),
        country: "Netherlands".to_string(),
    }
}
