// =============================================================================
// Momentum — average daily price change over the latest 5-bar window
// =============================================================================
//
//   momentum = (close[last] - close[last - 5]) / 5
//
// Fewer than 5 bars => 0.0.  With exactly 5 bars there is no `last - 5`
// bar, so the window is anchored at the earliest close instead.

/// Number of bars in the momentum window.
pub const MOMENTUM_WINDOW: usize = 5;

/// Momentum over `closes` (chronological order), in price units per bar.
pub fn calculate_momentum(closes: &[f64]) -> f64 {
    if closes.len() < MOMENTUM_WINDOW {
        return 0.0;
    }

    let last = closes.len() - 1;
    let anchor = last.saturating_sub(MOMENTUM_WINDOW);
    let momentum = (closes[last] - closes[anchor]) / MOMENTUM_WINDOW as f64;

    if momentum.is_finite() {
        momentum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_insufficient_data() {
        assert_eq!(calculate_momentum(&[]), 0.0);
        assert_eq!(calculate_momentum(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(calculate_momentum(&[1.0, 2.0, 3.0, 4.0]), 0.0);
    }

    #[test]
    fn momentum_six_bars() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        assert!((calculate_momentum(&closes) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn momentum_uses_latest_window_only() {
        // Only closes[3] and closes[8] matter.
        let closes = [50.0, 1.0, 99.0, 20.0, 7.0, 7.0, 7.0, 7.0, 10.0];
        assert!((calculate_momentum(&closes) - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn momentum_five_bars_anchors_at_first_close() {
        let closes = [10.0, 10.5, 11.0, 11.5, 12.0];
        assert!((calculate_momentum(&closes) - 0.4).abs() < 1e-12);
    }
}
