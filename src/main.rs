// =============================================================================
// Stock Highlights — Main Entry Point
// =============================================================================
//
// Loads configuration, wires the Yahoo market-data client and the headline
// client into shared state, warms the analytics cache in the background and
// serves the REST API until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stock_highlights::api;
use stock_highlights::app_state::AppState;
use stock_highlights::config::AppConfig;
use stock_highlights::market_data::YahooClient;
use stock_highlights::news::NewsClient;

const DEFAULT_CONFIG_PATH: &str = "highlights_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Stock Highlights starting up");

    let config_path =
        std::env::var("HIGHLIGHTS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();

    info!(
        trending = ?config.watchlists.trending,
        period = %config.period,
        top_n = config.top_n,
        "Configured watchlists"
    );

    // ── 2. Clients & shared state ────────────────────────────────────────
    let provider = Arc::new(YahooClient::new()?);
    let news = NewsClient::from_env(config.news.clone())?;
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(
        AppState::new(config, provider, news)
            .with_admin_token(std::env::var("HIGHLIGHTS_ADMIN_TOKEN").ok()),
    );
    if state.admin_token().is_none() {
        warn!("HIGHLIGHTS_ADMIN_TOKEN is not set — refresh endpoint is unauthenticated");
    }

    // ── 3. Warm the cache ────────────────────────────────────────────────
    let warm_state = state.clone();
    tokio::spawn(async move {
        let overview = warm_state.service.market_overview().await;
        let picks = warm_state.service.top_picks(None).await;
        warm_state.service.up_and_coming().await;
        info!(
            indices = overview.len(),
            picks = picks.len(),
            "Analytics cache warmed"
        );
    });

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        generation = state.generation(),
        "Stock Highlights shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
