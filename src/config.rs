// =============================================================================
// Configuration — watchlists, indicator parameters and server settings
// =============================================================================
//
// Loaded from JSON.  Every field carries a serde default so that a partial (or
// empty) file still yields a complete configuration, and adding fields never
// breaks older files.  Persistence uses the tmp + rename pattern.
//
// Secrets (news API key, admin token) are read from the environment only and
// never written to disk.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_trending() -> Vec<String> {
    symbols(&[
        "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "JPM", "WMT", "RY.TO", "TD.TO",
        "ENB.TO",
    ])
}

fn default_potential() -> Vec<String> {
    symbols(&[
        "PLTR", "SQ", "ROKU", "ZM", "CRSP", "DOCU", "PINS", "ETSY", "FVRR", "ENPH", "BCE.TO",
        "CNQ.TO",
    ])
}

fn default_economic() -> Vec<String> {
    symbols(&["SHOP.TO", "BNS.TO", "AMD", "TGT", "TD.TO", "CNQ.TO"])
}

fn default_indices() -> Vec<IndexSpec> {
    [
        ("^GSPC", "S&P 500 (US)"),
        ("^DJI", "Dow Jones (US)"),
        ("^IXIC", "NASDAQ (US)"),
        ("^GSPTSE", "TSX Composite (CA)"),
    ]
    .iter()
    .map(|(symbol, name)| IndexSpec {
        symbol: symbol.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn default_period() -> String {
    "1mo".to_string()
}

fn default_overview_period() -> String {
    "1d".to_string()
}

fn default_top_n() -> usize {
    crate::ranking::DEFAULT_TOP_N
}

fn default_table_limit() -> usize {
    10
}

fn default_rsi_period() -> usize {
    crate::indicators::DEFAULT_RSI_PERIOD
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_news_query() -> String {
    "stock market".to_string()
}

fn default_news_page_size() -> usize {
    5
}

fn default_news_base_url() -> String {
    "https://newsapi.org".to_string()
}

// =============================================================================
// Sections
// =============================================================================

/// A market index shown in the overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub symbol: String,
    pub name: String,
}

/// Symbol lists the highlights are computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlists {
    /// Source of the top picks and the trending table.
    #[serde(default = "default_trending")]
    pub trending: Vec<String>,

    /// Source of the up-and-coming table.
    #[serde(default = "default_potential")]
    pub potential: Vec<String>,

    /// Stocks to watch based on economic news.
    #[serde(default = "default_economic")]
    pub economic: Vec<String>,

    /// Indices for the market overview, in display order.
    #[serde(default = "default_indices")]
    pub indices: Vec<IndexSpec>,
}

impl Default for Watchlists {
    fn default() -> Self {
        Self {
            trending: default_trending(),
            potential: default_potential(),
            economic: default_economic(),
            indices: default_indices(),
        }
    }
}

impl Watchlists {
    /// Every symbol a user can open in detail: trending, then potential.
    pub fn explore(&self) -> Vec<String> {
        let mut all = self.trending.clone();
        all.extend(self.potential.iter().cloned());
        all
    }
}

/// Headline feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_query")]
    pub query: String,

    /// Number of headlines requested.
    #[serde(default = "default_news_page_size")]
    pub page_size: usize,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            query: default_news_query(),
            page_size: default_news_page_size(),
            base_url: default_news_base_url(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub watchlists: Watchlists,

    /// Lookback period for watchlist analytics.
    #[serde(default = "default_period")]
    pub period: String,

    /// Lookback period for the index overview.
    #[serde(default = "default_overview_period")]
    pub overview_period: String,

    /// Number of top picks.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Row limit for the trending and up-and-coming tables.
    #[serde(default = "default_table_limit")]
    pub table_limit: usize,

    /// RSI smoothing span.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Upper bound on a single market-data fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub news: NewsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watchlists: Watchlists::default(),
            period: default_period(),
            overview_period: default_overview_period(),
            top_n: default_top_n(),
            table_limit: default_table_limit(),
            rsi_period: default_rsi_period(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            bind_addr: default_bind_addr(),
            news: NewsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            trending = config.watchlists.trending.len(),
            period = %config.period,
            "config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` atomically (write `.tmp`, then
    /// rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }

    /// Apply `HIGHLIGHTS_TRENDING` and `HIGHLIGHTS_BIND_ADDR` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(list) = std::env::var("HIGHLIGHTS_TRENDING") {
            self.override_trending(&list);
        }
        if let Ok(addr) = std::env::var("HIGHLIGHTS_BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
    }

    /// Replace the trending watchlist from a comma-separated list.  An empty
    /// list leaves the current one in place.
    pub fn override_trending(&mut self, list: &str) {
        let parsed: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !parsed.is_empty() {
            self.watchlists.trending = parsed;
        }
    }
}
