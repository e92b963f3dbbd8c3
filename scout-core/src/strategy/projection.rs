//! Projected value and the confidence placeholder.

use serde::{Deserialize, Serialize};

use super::round2;
use crate::seed::confidence_hash;

/// Value of `investment` after applying `return_pct`.
///
/// Computed as the fractional share quantity bought at `latest_price` times
/// the terminal price. Undefined when the price is missing or non-positive,
/// or the investment is not positive.
pub fn projected_value(investment: f64, latest_price: Option<f64>, return_pct: f64) -> Option<f64> {
    let price = latest_price.filter(|p| p.is_finite() && *p > 0.0)?;
    if !(investment.is_finite() && investment > 0.0) {
        return None;
    }
    let quantity = investment / price;
    let terminal_price = price * (1.0 + return_pct / 100.0);
    Some(round2(quantity * terminal_price))
}

/// Display-only confidence score, stable per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub min: u8,
    pub max: u8,
}

impl Default for ConfidenceRange {
    fn default() -> Self {
        Self { min: 65, max: 95 }
    }
}

impl ConfidenceRange {
    /// Score in `[min, max]` (bounds clamped to 100 and ordered).
    pub fn score(&self, symbol: &str) -> u8 {
        let lo = self.min.min(self.max).min(100);
        let hi = self.max.max(self.min).min(100);
        let span = u64::from(hi - lo) + 1;
        // `span` <= 101, so the offset always fits in a u8.
        lo + (confidence_hash(symbol) % span) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example() {
        assert_eq!(projected_value(100_000.0, Some(3500.0), 2.15), Some(102_150.0));
    }

    #[test]
    fn undefined_without_positive_price() {
        assert_eq!(projected_value(100_000.0, None, 5.0), None);
        assert_eq!(projected_value(100_000.0, Some(0.0), 5.0), None);
        assert_eq!(projected_value(100_000.0, Some(-1.0), 5.0), None);
        assert_eq!(projected_value(100_000.0, Some(f64::NAN), 5.0), None);
    }

    #[test]
    fn undefined_without_positive_investment() {
        assert_eq!(projected_value(0.0, Some(100.0), 5.0), None);
        assert_eq!(projected_value(-10.0, Some(100.0), 5.0), None);
    }

    #[test]
    fn negative_return_shrinks_value() {
        assert_eq!(projected_value(1000.0, Some(40.0), -10.0), Some(900.0));
    }

    #[test]
    fn confidence_within_range_and_stable() {
        let range = ConfidenceRange::default();
        for sym in ["TCS.NS", "INFY.NS", "ITC.NS", "SBIN.NS"] {
            let c = range.score(sym);
            assert!((65..=95).contains(&c));
            assert_eq!(c, range.score(sym));
        }
    }

    #[test]
    fn confidence_alternate_range() {
        let range = ConfidenceRange { min: 70, max: 95 };
        assert!((70..=95).contains(&range.score("TCS.NS")));
    }

    #[test]
    fn degenerate_ranges_are_handled() {
        assert_eq!(ConfidenceRange { min: 80, max: 80 }.score("TCS.NS"), 80);
        assert!((70..=90).contains(&ConfidenceRange { min: 90, max: 70 }.score("TCS.NS")));
        assert!(ConfidenceRange { min: 0, max: 255 }.score("TCS.NS") <= 100);
    }
}
