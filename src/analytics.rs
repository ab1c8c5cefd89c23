// =============================================================================
// Symbol Analytics Builder
// =============================================================================
//
// Fetch -> indicators -> labels, once per symbol.  Each symbol is fetched
// independently and concurrently; a failed, timed-out or empty fetch drops
// only that symbol from the output.  Missing keys are the failure signal.
// =============================================================================

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::{analyst_label, risk_label};
use crate::indicators::{calculate_momentum, current_rsi, day_change};
use crate::market_data::{FetchError, FetchResult, MarketDataProvider, PriceSeries};
use crate::types::{AnalystLabel, RiskLabel};

/// Analytics keyed by symbol.
pub type AnalyticsMap = BTreeMap<String, SymbolAnalytics>;

// =============================================================================
// SymbolAnalytics
// =============================================================================

/// Derived indicators and labels for one symbol, plus the series they were
/// computed from (kept for charting).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolAnalytics {
    pub symbol: String,
    /// Latest close.
    pub price: f64,
    /// Percent move from the latest bar's open to its close.
    pub day_change: f64,
    /// Average daily price change over the latest 5-bar window.
    pub momentum: f64,
    /// Latest RSI; `None` when undefined (single-bar series).
    pub rsi: Option<f64>,
    pub analyst: AnalystLabel,
    pub risk: RiskLabel,
    /// Latest close at or above the first close.
    pub trend_up: bool,
    pub series: PriceSeries,
}

impl SymbolAnalytics {
    /// Compute the record for `series`.  Returns `None` for an empty series.
    pub fn from_series(series: PriceSeries, rsi_period: usize) -> Option<Self> {
        let last = series.last()?;
        let price = last.close;
        let day_change = day_change(&series)?;
        let closes = series.closes();
        let momentum = calculate_momentum(&closes);
        let rsi = current_rsi(&series, rsi_period);

        Some(Self {
            symbol: series.symbol().to_string(),
            price,
            day_change,
            momentum,
            rsi,
            analyst: analyst_label(rsi.unwrap_or(0.0)),
            risk: risk_label(day_change),
            trend_up: series.trend_up(),
            series,
        })
    }
}

// =============================================================================
// AnalyticsBuilder
// =============================================================================

/// Builds [`SymbolAnalytics`] for a batch of symbols from a market-data
/// provider.
pub struct AnalyticsBuilder {
    provider: Arc<dyn MarketDataProvider>,
    rsi_period: usize,
    fetch_timeout: Duration,
}

impl AnalyticsBuilder {
    pub fn new(provider: Arc<dyn MarketDataProvider>, rsi_period: usize, fetch_timeout: Duration) -> Self {
        Self {
            provider,
            rsi_period,
            fetch_timeout,
        }
    }

    /// Fetch one series, bounded by the configured timeout.
    pub async fn fetch_series(&self, symbol: &str, period: &str) -> FetchResult {
        match tokio::time::timeout(self.fetch_timeout, self.provider.fetch(symbol, period)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout.as_secs())),
        }
    }

    /// Build analytics for every symbol that yields data.
    ///
    /// Duplicate symbols are fetched once.  Symbols whose fetch fails or
    /// returns no bars are absent from the result.
    pub async fn build(&self, symbols: &[String], period: &str) -> AnalyticsMap {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = symbols
            .iter()
            .map(String::as_str)
            .filter(|s| seen.insert(*s))
            .collect();

        let fetches = unique.iter().map(|&symbol| async move {
            let outcome = self.fetch_series(symbol, period).await;
            (symbol, outcome)
        });
        let outcomes = join_all(fetches).await;

        let mut analytics = AnalyticsMap::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(series) => match SymbolAnalytics::from_series(series, self.rsi_period) {
                    Some(record) => {
                        debug!(
                            symbol,
                            price = record.price,
                            day_change = record.day_change,
                            momentum = record.momentum,
                            analyst = %record.analyst,
                            "analytics computed"
                        );
                        analytics.insert(symbol.to_string(), record);
                    }
                    None => warn!(symbol, "empty price series — symbol omitted"),
                },
                Err(e) => warn!(symbol, error = %e, "fetch failed — symbol omitted"),
            }
        }

        info!(
            requested = unique.len(),
            built = analytics.len(),
            period,
            "analytics batch complete"
        );
        analytics
    }
}

// =============================================================================
// Tests
// =============================================================================
