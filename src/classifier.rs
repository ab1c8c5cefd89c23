// =============================================================================
// Classifier — indicator values to categorical labels
// =============================================================================
//
// Analyst label (RSI):
//   RSI < 50        =>  Buy
//   50 <= RSI < 70  =>  Hold
//   RSI >= 70       =>  Sell
//
// Risk label (day change, percent):
//   |change| > 5    =>  High
//   otherwise       =>  Medium
// =============================================================================

use crate::types::{AnalystLabel, RiskLabel};

const BUY_BELOW_RSI: f64 = 50.0;
const SELL_FROM_RSI: f64 = 70.0;
const HIGH_RISK_ABOVE_PCT: f64 = 5.0;

/// Classify an RSI value.  Callers substitute 0.0 for an undefined RSI.
pub fn analyst_label(rsi: f64) -> AnalystLabel {
    if rsi < BUY_BELOW_RSI {
        AnalystLabel::Buy
    } else if rsi < SELL_FROM_RSI {
        AnalystLabel::Hold
    } else {
        AnalystLabel::Sell
    }
}

/// Classify a day change given in percent.
pub fn risk_label(day_change_pct: f64) -> RiskLabel {
    if day_change_pct.abs() > HIGH_RISK_ABOVE_PCT {
        RiskLabel::High
    } else {
        RiskLabel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyst_label_steps() {
        assert_eq!(analyst_label(0.0), AnalystLabel::Buy);
        assert_eq!(analyst_label(49.999), AnalystLabel::Buy);
        assert_eq!(analyst_label(60.0), AnalystLabel::Hold);
        assert_eq!(analyst_label(100.0), AnalystLabel::Sell);
    }

    #[test]
    fn analyst_label_boundaries() {
        assert_eq!(analyst_label(50.0), AnalystLabel::Hold);
        assert_eq!(analyst_label(69.999), AnalystLabel::Hold);
        assert_eq!(analyst_label(70.0), AnalystLabel::Sell);
    }

    #[test]
    fn risk_label_boundary_is_exclusive() {
        assert_eq!(risk_label(5.0), RiskLabel::Medium);
        assert_eq!(risk_label(5.01), RiskLabel::High);
    }

    #[test]
    fn risk_label_uses_magnitude() {
        assert_eq!(risk_label(-5.0), RiskLabel::Medium);
        assert_eq!(risk_label(-7.5), RiskLabel::High);
        assert_eq!(risk_label(0.0), RiskLabel::Medium);
    }
}
