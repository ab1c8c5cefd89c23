// =============================================================================
// Highlights Service — the façade the presentation shell calls
// =============================================================================
//
// Every section of the daily highlights goes through the analytics cache, so
// one refresh cycle costs one fetch per (watchlist, period) and `refresh()`
// is the only way to see newer prices.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{AnalyticsBuilder, AnalyticsMap, SymbolAnalytics};
use crate::cache::{AnalyticsCache, CacheKey, CacheStats};
use crate::config::AppConfig;
use crate::indicators::period_change;
use crate::market_data::MarketDataProvider;
use crate::ranking::{self, PickTier, RankedPick, RankedRow};

/// One market index in the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Percent move from the first open of the period to the latest close.
    pub change: f64,
}

/// Owned top-pick entry.
#[derive(Debug, Clone, Serialize)]
pub struct Pick {
    pub rank: usize,
    pub symbol: String,
    pub tier: PickTier,
    pub analytics: SymbolAnalytics,
}

impl From<RankedPick<'_>> for Pick {
    fn from(p: RankedPick<'_>) -> Self {
        Self {
            rank: p.rank,
            symbol: p.symbol.to_string(),
            tier: p.tier,
            analytics: p.analytics.clone(),
        }
    }
}

/// Owned table row.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub rank: usize,
    pub symbol: String,
    pub analytics: SymbolAnalytics,
}

impl From<RankedRow<'_>> for Row {
    fn from(r: RankedRow<'_>) -> Self {
        Self {
            rank: r.rank,
            symbol: r.symbol.to_string(),
            analytics: r.analytics.clone(),
        }
    }
}

pub struct HighlightsService {
    builder: AnalyticsBuilder,
    cache: AnalyticsCache,
    config: AppConfig,
}

impl HighlightsService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: AppConfig) -> Self {
        let builder = AnalyticsBuilder::new(
            provider,
            config.rsi_period,
            Duration::from_secs(config.fetch_timeout_secs),
        );
        Self {
            builder,
            cache: AnalyticsCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cached analytics for `symbols` over `period`.
    pub async fn analytics(&self, symbols: &[String], period: &str) -> Arc<AnalyticsMap> {
        let key = CacheKey::new(symbols, period);
        self.cache
            .get_or_compute(key, || self.builder.build(symbols, period))
            .await
    }

    /// Index snapshots in configured order; indices without data are left out.
    pub async fn market_overview(&self) -> Vec<IndexQuote> {
        let indices = &self.config.watchlists.indices;
        let symbols: Vec<String> = indices.iter().map(|i| i.symbol.clone()).collect();
        let analytics = self.analytics(&symbols, &self.config.overview_period).await;

        indices
            .iter()
            .filter_map(|index| {
                let record = analytics.get(&index.symbol)?;
                let change = period_change(&record.series)?;
                Some(IndexQuote {
                    symbol: index.symbol.clone(),
                    name: index.name.clone(),
                    price: record.price,
                    change,
                })
            })
            .collect()
    }

    /// Top picks from the trending watchlist.  `n` defaults to the
    /// configured `top_n`.
    pub async fn top_picks(&self, n: Option<usize>) -> Vec<Pick> {
        let n = n.unwrap_or(self.config.top_n);
        let analytics = self.trending_analytics().await;
        let picks: Vec<Pick> = ranking::top_picks(analytics.values(), n)
            .into_iter()
            .map(Pick::from)
            .collect();

        if picks.is_empty() {
            info!(universe = analytics.len(), "no stocks with a strong upward trend today");
        } else {
            debug!(picks = ?picks.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>(), "top picks");
        }
        picks
    }

    /// Trending watchlist ordered by day change.
    pub async fn trending(&self) -> Vec<Row> {
        let analytics = self.trending_analytics().await;
        ranking::rank_by_change(analytics.values(), self.config.table_limit)
            .into_iter()
            .map(Row::from)
            .collect()
    }

    /// Potential watchlist ordered by momentum magnitude.
    pub async fn up_and_coming(&self) -> Vec<Row> {
        let analytics = self
            .analytics(&self.config.watchlists.potential, &self.config.period)
            .await;
        ranking::rank_by_momentum_magnitude(analytics.values(), self.config.table_limit)
            .into_iter()
            .map(Row::from)
            .collect()
    }

    /// Economic watchlist, ordered by symbol.
    pub async fn economic_picks(&self) -> Vec<Row> {
        let analytics = self
            .analytics(&self.config.watchlists.economic, &self.config.period)
            .await;
        analytics
            .values()
            .enumerate()
            .map(|(i, record)| Row {
                rank: i + 1,
                symbol: record.symbol.clone(),
                analytics: record.clone(),
            })
            .collect()
    }

    /// Full analytics for one symbol of the explore universe.
    pub async fn symbol_detail(&self, symbol: &str) -> Option<SymbolAnalytics> {
        let universe = self.config.watchlists.explore();
        if !universe.iter().any(|s| s == symbol) {
            return None;
        }
        let analytics = self.analytics(&universe, &self.config.period).await;
        analytics.get(symbol).cloned()
    }

    /// Drop all cached analytics so the next request refetches.
    pub fn refresh(&self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn trending_analytics(&self) -> Arc<AnalyticsMap> {
        self.analytics(&self.config.watchlists.trending, &self.config.period)
            .await
    }
}

// =============================================================================
// Tests
// =============================================================================
