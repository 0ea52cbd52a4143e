use clap::Parser;
use std::time::Duration;

use crate::live_scores::MockFixtureSet;
use crate::service::FetchMode;

/// Live football scores API
#[derive(Parser, Debug, Clone)]
#[command(name = "live-scores-api", version, about)]
pub struct Config {
    /// API-Football key. Without it the server runs in mock-only mode
    #[arg(long, env = "API_KEY")]
    pub api_key: Option<String>,

    /// Upstream live fixtures endpoint
    #[arg(
        long,
        env = "UPSTREAM_URL",
        default_value = "https://v3.football.api-sports.io/fixtures?live=all"
    )]
    pub upstream_url: String,

    /// Value sent in the x-rapidapi-host header
    #[arg(long, env = "UPSTREAM_HOST", default_value = "v3.football.api-sports.io")]
    pub upstream_host: String,

    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: String,

    /// Background refresh interval in seconds
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "60")]
    pub refresh_interval_secs: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// When live data is fetched: background, on-demand or both
    #[arg(long, env = "FETCH_MODE", value_enum, default_value = "background")]
    pub fetch_mode: FetchMode,

    /// Sample dataset served when there is no live data
    #[arg(long, env = "MOCK_SET", value_enum, default_value = "full")]
    pub mock_set: MockFixtureSet,

    /// Serve the sample dataset when there is no live data
    #[arg(
        long,
        env = "MOCK_FALLBACK",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub mock_fallback: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        if let Err(e) = url::Url::parse(&self.upstream_url) {
            anyhow::bail!("upstream_url '{}' is not a valid URL: {}", self.upstream_url, e);
        }
        if self.upstream_host.trim().is_empty() {
            anyhow::bail!("upstream_host must not be empty");
        }
        Ok(())
    }

    /// Configured API key; a blank value counts as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
