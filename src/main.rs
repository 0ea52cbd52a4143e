use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

mod cache;
mod config;
mod dashboard;
mod error;
mod live_scores;
mod models;
mod service;

use cache::ScoreCache;
use config::Config;
use dashboard::AppState;
use live_scores::{ApiFootball, Refresher, ScoreProvider};
use service::ScoreService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let cache = ScoreCache::new();

    let provider: Option<Arc<dyn ScoreProvider>> = match config.api_key() {
        Some(key) => Some(Arc::new(ApiFootball::new(
            key,
            &config.upstream_host,
            &config.upstream_url,
            config.request_timeout(),
        )?)),
        None => {
            warn!("No API key provided. Using mock data only.");
            None
        }
    };

    info!(
        "Fetch mode: {:?}, mock set: {:?}, mock fallback: {}",
        config.fetch_mode, config.mock_set, config.mock_fallback
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Background refresher only runs with a credential
    let refresher = match &provider {
        Some(p) if config.fetch_mode.runs_refresher() => Some(
            Refresher::new(p.clone(), cache.clone(), config.refresh_interval()).spawn(shutdown_rx),
        ),
        _ => None,
    };

    let state = AppState {
        scores: ScoreService::new(
            cache,
            provider,
            config.fetch_mode,
            config.mock_set,
            config.mock_fallback,
        ),
    };
    if !state.scores.has_credential() {
        info!("/api/scores will serve mock data");
    }
    let app = dashboard::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = refresher {
        if let Err(e) = handle.await {
            warn!("Refresher task ended abnormally: {}", e);
        }
    }

    Ok(())
}
