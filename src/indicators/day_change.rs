// =============================================================================
// Percent change helpers
// =============================================================================
//
//   day_change    = (close[last] - open[last])  / open[last]  * 100
//   period_change = (close[last] - open[first]) / open[first] * 100
//
// Both are undefined on an empty series; callers skip such symbols.

use crate::market_data::PriceSeries;

/// Percent move from the latest bar's open to its close.
pub fn day_change(series: &PriceSeries) -> Option<f64> {
    let last = series.last()?;
    percent_change(last.open, last.close)
}

/// Percent move from the first bar's open to the latest close.  Used for the
/// index overview, where the series covers a single session.
pub fn period_change(series: &PriceSeries) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    percent_change(first.open, last.close)
}

fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    let pct = (to - from) / from * 100.0;
    pct.is_finite().then_some(pct)
}
