// =============================================================================
// Central Application State
// =============================================================================
//
// Ties the highlights service and the headline client together for the REST
// layer.  Shared across handlers via `Arc<AppState>`.
//
// `generation` counts refreshes: every cache invalidation bumps it, so a
// dashboard can tell whether what it shows predates the latest refresh.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use crate::config::AppConfig;
use crate::highlights::HighlightsService;
use crate::market_data::MarketDataProvider;
use crate::news::NewsClient;

pub struct AppState {
    pub service: HighlightsService,
    pub news: NewsClient,

    /// Bumped on every refresh.
    generation: AtomicU64,

    /// Time of the last refresh (or of startup).
    last_refresh: RwLock<DateTime<Utc>>,

    /// Bearer token guarding the refresh endpoint; `None` leaves it open.
    admin_token: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn MarketDataProvider>, news: NewsClient) -> Self {
        Self {
            service: HighlightsService::new(provider, config),
            news,
            generation: AtomicU64::new(0),
            last_refresh: RwLock::new(Utc::now()),
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    pub fn last_refresh(&self) -> DateTime<Utc> {
        *self.last_refresh.read()
    }

    /// Invalidate every cached analytics result.  Returns the new generation.
    pub fn refresh(&self) -> u64 {
        self.service.refresh();
        *self.last_refresh.write() = Utc::now();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        info!(generation, "highlights refreshed");
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::market_data::testing::StaticProvider;

    #[tokio::test]
    async fn refresh_bumps_generation_and_clears_cache() {
        let provider = Arc::new(StaticProvider::new().with_closes("AAPL", &[1.0, 2.0]));
        let config = AppConfig {
            watchlists: crate::config::Watchlists {
                trending: vec!["AAPL".into()],
                ..Default::default()
            },
            ..AppConfig::default()
        };
        let news = NewsClient::new(None, NewsConfig::default()).unwrap();
        let state = AppState::new(config, provider.clone(), news);

        state.service.trending().await;
        assert_eq!(state.generation(), 0);
        let before = state.last_refresh();

        assert_eq!(state.refresh(), 1);
        assert_eq!(state.generation(), 1);
        assert!(state.last_refresh() >= before);
        assert_eq!(state.service.cache_stats().entries, 0);

        state.service.trending().await;
        assert_eq!(provider.calls_for("AAPL"), 2);
    }

    #[test]
    fn blank_admin_token_is_ignored() {
        let news = NewsClient::new(None, NewsConfig::default()).unwrap();
        let state = AppState::new(AppConfig::default(), Arc::new(StaticProvider::new()), news)
            .with_admin_token(Some("   ".into()));
        assert_eq!(state.admin_token(), None);
    }
}
