// In-memory provider used by the unit tests of the builder, cache, service
// and REST layers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;

use super::provider::{FetchError, FetchResult, MarketDataProvider};
use super::{Bar, PriceSeries};

#[derive(Default)]
pub struct StaticProvider {
    bars: HashMap<String, Vec<Bar>>,
    failures: HashMap<String, FetchError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    calls_by_symbol: Mutex<HashMap<String, usize>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol with `(open, close)` pairs on consecutive days.
    pub fn with_bars(mut self, symbol: &str, bars: &[(f64, f64)]) -> Self {
        self.bars.insert(symbol.to_string(), make_bars(bars));
        self
    }

    /// Register a symbol with closes only; each open is the previous close
    /// (the first open equals the first close).
    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Self {
        let pairs: Vec<(f64, f64)> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (if i == 0 { c } else { closes[i - 1] }, c))
            .collect();
        self.with_bars(symbol, &pairs)
    }

    pub fn with_failure(mut self, symbol: &str, err: FetchError) -> Self {
        self.failures.insert(symbol.to_string(), err);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls_by_symbol.lock().get(symbol).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch(&self, symbol: &str, _period: &str) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_symbol
            .lock()
            .entry(symbol.to_string())
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.failures.get(symbol) {
            return Err(err.clone());
        }
        match self.bars.get(symbol) {
            Some(bars) => Ok(PriceSeries::new(symbol, bars.clone())),
            None => Err(FetchError::Status {
                status: 404,
                body: format!("unknown symbol {symbol}"),
            }),
        }
    }
}

pub fn make_bars(pairs: &[(f64, f64)]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| {
            let date = start + chrono::Days::new(i as u64);
            Bar::new(date, open, open.max(close), open.min(close), close, 1_000.0)
        })
        .collect()
}
