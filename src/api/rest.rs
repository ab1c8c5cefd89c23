// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Read endpoints are public and served
// from the analytics cache.  `POST /refresh` invalidates the cache and is
// guarded by `AdminGuard` when an admin token is configured.
//
// CORS is permissive; the dashboard is served from a different origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api::auth::AdminGuard;
use crate::app_state::AppState;
use crate::highlights::Pick;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Highlights ──────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/overview", get(overview))
        .route("/api/v1/top-picks", get(top_picks))
        .route("/api/v1/trending", get(trending))
        .route("/api/v1/up-and-coming", get(up_and_coming))
        .route("/api/v1/economic-picks", get(economic_picks))
        .route("/api/v1/symbols/:symbol", get(symbol_detail))
        .route("/api/v1/news", get(news))
        // ── Cache control ───────────────────────────────────────────
        .route("/api/v1/refresh", post(refresh))
        .route("/api/v1/cache/stats", get(cache_stats))
        // ── Middleware & State ──────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    generation: u64,
    last_refresh: String,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        generation: state.generation(),
        last_refresh: state.last_refresh().to_rfc3339(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Highlights
// =============================================================================

async fn overview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.market_overview().await)
}

#[derive(Deserialize)]
struct TopPicksQuery {
    #[serde(default)]
    n: Option<usize>,
}

#[derive(Serialize)]
struct TopPicksResponse {
    picks: Vec<Pick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

async fn top_picks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopPicksQuery>,
) -> impl IntoResponse {
    let picks = state.service.top_picks(query.n).await;
    let message = picks
        .is_empty()
        .then_some("No stocks with a strong upward trend today.");
    Json(TopPicksResponse { picks, message })
}

async fn trending(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.trending().await)
}

async fn up_and_coming(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.up_and_coming().await)
}

async fn economic_picks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.economic_picks().await)
}

async fn symbol_detail(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let symbol = symbol.trim().to_uppercase();
    match state.service.symbol_detail(&symbol).await {
        Some(record) => Ok(Json(record)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("No data available for '{}'", symbol),
            })),
        )),
    }
}

// =============================================================================
// News
// =============================================================================

#[derive(Deserialize)]
struct NewsQuery {
    #[serde(default)]
    q: Option<String>,
}

async fn news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> impl IntoResponse {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| state.news.default_query().to_string());
    Json(state.news.headlines(&q).await)
}

// =============================================================================
// Cache control
// =============================================================================

#[derive(Serialize)]
struct RefreshResponse {
    generation: u64,
    message: &'static str,
}

async fn refresh(_guard: AdminGuard, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let generation = state.refresh();
    info!(generation, "cache refresh requested via API");
    Json(RefreshResponse {
        generation,
        message: "Analytics cache cleared",
    })
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.cache_stats())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::config::{AppConfig, IndexSpec, NewsConfig, Watchlists};
    use crate::market_data::testing::StaticProvider;
    use crate::news::NewsClient;

    fn state(admin_token: Option<&str>) -> (Arc<AppState>, Arc<StaticProvider>) {
        let provider = Arc::new(
            StaticProvider::new()
                .with_closes("UP", &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0])
                .with_closes("DOWN", &[10.0, 9.0])
                .with_closes("NEW", &[5.0, 5.5, 6.0])
                .with_bars("^IDX", &[(100.0, 103.0)]),
        );
        let config = AppConfig {
            watchlists: Watchlists {
                trending: vec!["UP".into(), "DOWN".into()],
                potential: vec!["NEW".into()],
                economic: vec!["UP".into()],
                indices: vec![IndexSpec {
                    symbol: "^IDX".into(),
                    name: "Index".into(),
                }],
            },
            ..AppConfig::default()
        };
        let news = NewsClient::new(None, NewsConfig::default()).unwrap();
        let state = AppState::new(config, provider.clone(), news)
            .with_admin_token(admin_token.map(str::to_string));
        (Arc::new(state), provider)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_generation() {
        let (state, _) = state(None);
        let (status, body) = send(router(state), get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["generation"], 0);
    }

    #[tokio::test]
    async fn top_picks_endpoint_returns_ranked_symbols() {
        let (state, _) = state(None);
        let (status, body) = send(router(state), get("/api/v1/top-picks?n=2")).await;
        assert_eq!(status, StatusCode::OK);
        let picks = body["picks"].as_array().unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0]["symbol"], "UP");
        assert_eq!(picks[0]["rank"], 1);
        assert_eq!(picks[0]["analytics"]["analyst"], "Sell");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn overview_and_tables() {
        let (state, _) = state(None);

        let (_, body) = send(router(state.clone()), get("/api/v1/overview")).await;
        assert_eq!(body[0]["name"], "Index");
        assert!((body[0]["change"].as_f64().unwrap() - 3.0).abs() < 1e-9);

        let (_, body) = send(router(state.clone()), get("/api/v1/trending")).await;
        assert_eq!(body[0]["symbol"], "UP");
        assert_eq!(body[1]["symbol"], "DOWN");

        let (_, body) = send(router(state), get("/api/v1/up-and-coming")).await;
        assert_eq!(body[0]["symbol"], "NEW");
    }

    #[tokio::test]
    async fn unknown_symbol_is_404() {
        let (state, _) = state(None);
        let (status, body) = send(router(state.clone()), get("/api/v1/symbols/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("NOPE"));

        let (status, body) = send(router(state), get("/api/v1/symbols/new")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "NEW");
    }

    #[tokio::test]
    async fn refresh_without_configured_token_is_open() {
        let (state, provider) = state(None);
        send(router(state.clone()), get("/api/v1/trending")).await;

        let (status, body) = send(router(state.clone()), post("/api/v1/refresh", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], 1);

        send(router(state), get("/api/v1/trending")).await;
        assert_eq!(provider.calls_for("UP"), 2);
    }

    #[tokio::test]
    async fn refresh_requires_matching_token_when_configured() {
        let (state, _) = state(Some("s3cret"));

        let (status, _) = send(router(state.clone()), post("/api/v1/refresh", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(router(state.clone()), post("/api/v1/refresh", Some("wrong"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(state.generation(), 0);

        let (status, _) = send(router(state.clone()), post("/api/v1/refresh", Some("s3cret"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.generation(), 1);
    }

    #[tokio::test]
    async fn cache_stats_track_hits() {
        let (state, _) = state(None);
        send(router(state.clone()), get("/api/v1/trending")).await;
        send(router(state.clone()), get("/api/v1/top-picks")).await;

        let (_, body) = send(router(state), get("/api/v1/cache/stats")).await;
        assert_eq!(body["misses"], 1);
        assert_eq!(body["hits"], 1);
        assert_eq!(body["entries"], 1);
    }

    #[tokio::test]
    async fn news_without_key_is_empty_list() {
        let (state, _) = state(None);
        let (status, body) = send(router(state), get("/api/v1/news?q=earnings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
