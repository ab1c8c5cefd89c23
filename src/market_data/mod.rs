pub mod price_series;
pub mod provider;
pub mod yahoo;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use price_series::{Bar, PriceSeries};
pub use provider::{FetchError, FetchResult, MarketDataProvider};
pub use yahoo::YahooClient;

#[cfg(test)]
pub mod testing;
