// =============================================================================
// Relative Strength Index (RSI) — exponentially weighted averages
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into gain = max(delta, 0) and loss = max(-delta, 0).
// Step 3 — Smooth gains and losses with an EMA of span `period`:
//            alpha    = 2 / (period + 1)
//            avg_t    = alpha * x_t + (1 - alpha) * avg_{t-1}
//          seeded with the first delta (no bias adjustment).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// avg_loss == 0 is an explicit case: RSI = 100, including a flat market.
// =============================================================================

use crate::market_data::PriceSeries;

/// Default look-back span.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Compute the RSI series aligned to `closes`.
///
/// The output has exactly one entry per close.  The first entry is always
/// `None` because the first bar has no delta.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - empty input => empty vec
/// - average loss of zero => 100.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(closes.len());
    result.push(None);

    let mut averages: Option<(f64, f64)> = None;
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        let (avg_gain, avg_loss) = match averages {
            None => (gain, loss),
            Some((g, l)) => (alpha * gain + (1.0 - alpha) * g, alpha * loss + (1.0 - alpha) * l),
        };
        averages = Some((avg_gain, avg_loss));

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Latest RSI of `series`, or `None` when it is undefined (fewer than two
/// bars).
pub fn current_rsi(series: &PriceSeries, period: usize) -> Option<f64> {
    calculate_rsi(&series.closes(), period)
        .last()
        .copied()
        .flatten()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}
