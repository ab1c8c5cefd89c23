// =============================================================================
// Stock Highlights — daily market highlights engine
// =============================================================================
//
// Fetches daily OHLCV series, derives momentum / RSI / day-change indicators,
// labels each symbol and ranks top picks.  Results are memoised per
// (watchlist, period) until an explicit refresh.
// =============================================================================

pub mod analytics;
pub mod api;
pub mod app_state;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod highlights;
pub mod indicators;
pub mod market_data;
pub mod news;
pub mod ranking;
pub mod types;
