use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::ScoreProvider;
use crate::error::{FetchError, FetchResult};
use crate::models::Match;

/// Live-score provider backed by API-Football (api-sports.io).
/// Docs: <https://www.api-football.com/documentation-v3>
pub struct ApiFootball {
    http: Client,
    api_key: String,
    host: String,
    /// Full fixtures URL, overridable in tests
    url: String,
}

impl ApiFootball {
    pub fn new(api_key: &str, host: &str, url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiFootball {
            http,
            api_key: api_key.to_string(),
            host: host.to_string(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ScoreProvider for ApiFootball {
    fn name(&self) -> &str {
        "API-Football"
    }

    async fn fetch_live_matches(&self) -> FetchResult<Vec<Match>> {
        debug!("Fetching live fixtures from {}", self.url);

        let resp = self
            .http
            .get(&self.url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = resp.bytes().await?;
        parse_fixtures_response(&body)
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FixturesEnvelope {
    #[serde(default)]
    response: Vec<FixtureItem>,
    /// `[]` when fine, an object like `{"token": "..."}` on quota/auth problems
    #[serde(default)]
    errors: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FixtureItem {
    fixture: Fixture,
    teams: Teams,
    goals: Goals,
    league: League,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    id: i64,
    status: FixtureStatus,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
    #[serde(deserialize_with = "present_or_null")]
    elapsed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Teams {
    home: Team,
    away: Team,
}

#[derive(Debug, Deserialize)]
struct Team {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Goals {
    #[serde(deserialize_with = "present_or_null")]
    home: Option<u32>,
    #[serde(deserialize_with = "present_or_null")]
    away: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct League {
    name: String,
    country: String,
}

/// Key must exist, value may be `null`. Plain `Option` fields would also
/// accept a missing key.
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl From<FixtureItem> for Match {
    fn from(item: FixtureItem) -> Self {
        Match {
            id: item.fixture.id,
            home_team: item.teams.home.name,
            away_team: item.teams.away.name,
            home_score: item.goals.home,
            away_score: item.goals.away,
            elapsed: item.fixture.status.elapsed,
            league: item.league.name,
            country: item.league.country,
        }
    }
}

fn has_errors(errors: &serde_json::Value) -> bool {
    match errors {
        serde_json::Value::Null => false,
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

fn parse_fixtures_response(body: &[u8]) -> FetchResult<Vec<Match>> {
    let envelope: FixturesEnvelope = serde_json::from_slice(body)?;

    if has_errors(&envelope.errors) {
        warn!("API-Football reported errors: {}", envelope.errors);
    }

    Ok(envelope.response.into_iter().map(Match::from).collect())
}
