// =============================================================================
// Market-data fetch contract
// =============================================================================
//
// Every fetch resolves to either a populated series or a `FetchError`.  The
// analytics builder turns any error into "no data for this symbol", so a
// provider never needs to decide whether a failure is fatal.
// =============================================================================

use thiserror::Error;

use super::PriceSeries;

/// Why a symbol produced no price series.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider payload: {0}")]
    Parse(String),

    #[error("no bars returned")]
    Empty,

    #[error("fetch timed out after {0}s")]
    Timeout(u64),
}

pub type FetchResult = Result<PriceSeries, FetchError>;

/// Source of daily price history.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the daily bars of `symbol` over the lookback `period`
    /// (e.g. `"1d"`, `"1mo"`).
    async fn fetch(&self, symbol: &str, period: &str) -> FetchResult;
}
