use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar is usable when both prices the indicators read are finite and
    /// strictly positive.
    fn is_usable(&self) -> bool {
        self.open.is_finite() && self.close.is_finite() && self.open > 0.0 && self.close > 0.0
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- canonical, immutable daily history for one symbol
// ---------------------------------------------------------------------------

/// Chronologically ascending daily bars for one symbol with no duplicate
/// dates.  Built once per fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Normalise raw provider bars into canonical form.
    ///
    /// * Bars with a non-finite or non-positive open/close are dropped.
    /// * Bars are ordered by date ascending.
    /// * When two bars share a date the one seen last wins.
    pub fn new(symbol: impl Into<String>, raw: Vec<Bar>) -> Self {
        let symbol = symbol.into();
        let raw_len = raw.len();

        let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
        for bar in raw.into_iter().filter(Bar::is_usable) {
            by_date.insert(bar.date, bar);
        }
        let bars: Vec<Bar> = by_date.into_values().collect();

        if bars.len() != raw_len {
            debug!(
                symbol = %symbol,
                raw = raw_len,
                kept = bars.len(),
                "price series normalised"
            );
        }

        Self { symbol, bars }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// `true` when the latest close is at or above the first close.  Charts
    /// colour the line by this.
    pub fn trend_up(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.close >= first.close,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> Bar {
        Bar::new(day(d), close, close + 1.0, close - 1.0, close, 1_000.0)
    }

    #[test]
    fn sorts_bars_ascending() {
        let series = PriceSeries::new("AAPL", vec![bar(3, 12.0), bar(1, 10.0), bar(2, 11.0)]);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.first().unwrap().date, day(1));
        assert_eq!(series.last().unwrap().date, day(3));
    }

    #[test]
    fn duplicate_dates_keep_last_seen() {
        let series = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(2, 11.0), bar(2, 11.5)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.5]);
    }

    #[test]
    fn drops_unusable_bars() {
        let mut nan_close = bar(2, 11.0);
        nan_close.close = f64::NAN;
        let mut zero_open = bar(3, 12.0);
        zero_open.open = 0.0;

        let series = PriceSeries::new("MSFT", vec![bar(1, 10.0), nan_close, zero_open, bar(4, 13.0)]);
        assert_eq!(series.closes(), vec![10.0, 13.0]);
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new("ZZZ", Vec::new());
        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(!series.trend_up());
    }

    #[test]
    fn trend_up_compares_first_and_last_close() {
        let up = PriceSeries::new("UP", vec![bar(1, 10.0), bar(2, 9.0), bar(3, 10.0)]);
        assert!(up.trend_up());

        let down = PriceSeries::new("DN", vec![bar(1, 10.0), bar(2, 11.0), bar(3, 9.5)]);
        assert!(!down.trend_up());
    }
}
