use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::service::ScoreService;

#[derive(Clone)]
pub struct AppState {
    pub scores: ScoreService,
}

/// Build the Axum router for the scores API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/scores", get(scores_handler))
        .route("/api/mock-scores", get(mock_scores_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler() -> impl IntoResponse {
    Html(SCOREBOARD_HTML)
}

/// GET /api/scores
async fn scores_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.scores.get_scores().await)
}

/// GET /api/mock-scores
async fn mock_scores_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.scores.get_mock_scores())
}

/// Embedded single-file scoreboard (HTML + CSS + JS)
const SCOREBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Live Scores</title>
<style>
  :root { --bg: #0f1117; --card: #1a1d27; --border: #2a2d3a; --green: #00c896; --text: #e0e0e0; --muted: #8888aa; }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .league { color: var(--muted); font-size: .75rem; text-transform: uppercase; margin-bottom: .5rem; }
  .row { display: flex; justify-content: space-between; font-size: 1rem; padding: .2rem 0; }
  .score { font-weight: 700; }
  .minute { color: var(--green); font-size: .8rem; margin-top: .4rem; }
  .empty { color: var(--muted); text-align: center; padding: 2rem; }
</style>
</head>
<body>
<header>
  <h1>⚽ Live Scores</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>
<main id="matches"><div class="empty">Loading…</div></main>
<script>
// Team and league names come from the upstream provider
const esc = v => String(v).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
const show = v => v == null ? '–' : esc(v);
async function load() {
  const r = await fetch('/api/scores');
  if (!r.ok) return;
  const s = await r.json();
  document.getElementById('last-updated').textContent = s.last_updated ? 'Updated ' + s.last_updated : '';
  const el = document.getElementById('matches');
  if (!s.matches.length) { el.innerHTML = '<div class="empty">No live matches</div>'; return; }
  el.innerHTML = s.matches.map(m => `<div class="card">
    <div class="league">${esc(m.league)} · ${esc(m.country)}</div>
    <div class="row"><span>${esc(m.home_team)}</span><span class="score">${show(m.home_score)}</span></div>
    <div class="row"><span>${esc(m.away_team)}</span><span class="score">${show(m.away_score)}</span></div>
    <div class="minute">${m.elapsed != null ? esc(m.elapsed) + "'" : 'Not started'}</div>
  </div>`).join('');
}
load();
setInterval(load, 60000);
</script>
</body>
</html>"#;
