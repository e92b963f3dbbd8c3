//! SMA-based Invest/Wait suggestion.

use crate::domain::{PriceSeries, Suggestion};
use crate::indicators::Sma;

pub const DEFAULT_SMA_WINDOW: usize = 20;
pub const DEFAULT_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaAdvice {
    pub sma: Option<f64>,
    pub suggestion: Suggestion,
}

/// Classifies a symbol by comparing its latest close to the trailing SMA and
/// to the investment amount.
///
/// `Invest` requires all of:
/// - an SMA (at least `window` observations),
/// - latest price no more than `tolerance` below the SMA,
/// - latest price no more than `tolerance` above the investment amount.
///
/// Anything else is `Wait`.
#[derive(Debug, Clone)]
pub struct SmaAdvisor {
    sma: Sma,
    tolerance: f64,
}

impl Default for SmaAdvisor {
    fn default() -> Self {
        Self::new(DEFAULT_SMA_WINDOW, DEFAULT_TOLERANCE)
    }
}

impl SmaAdvisor {
    pub fn new(window: usize, tolerance: f64) -> Self {
        Self {
            sma: Sma::new(window.max(1)),
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn advise(&self, series: Option<&PriceSeries>, investment: f64) -> SmaAdvice {
        let Some(series) = series else {
            return SmaAdvice {
                sma: None,
                suggestion: Suggestion::Wait,
            };
        };

        let sma = self.sma.latest(&series.observations());
        let suggestion = match (sma, series.latest()) {
            (Some(avg), Some(latest))
                if latest >= avg * (1.0 - self.tolerance)
                    && latest <= investment * (1.0 + self.tolerance) =>
            {
                Suggestion::Invest
            }
            _ => Suggestion::Wait,
        };

        SmaAdvice { sma, suggestion }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_points(closes.iter().enumerate().map(|(i, c)| {
            PricePoint::new(base + chrono::Duration::days(i as i64), Some(*c))
        }))
        .unwrap()
    }

    #[test]
    fn short_history_waits_without_sma() {
        let advice = SmaAdvisor::default().advise(Some(&series(&[100.0; 19])), 100_000.0);
        assert_eq!(advice.sma, None);
        assert_eq!(advice.suggestion, Suggestion::Wait);
    }

    #[test]
    fn missing_series_waits() {
        let advice = SmaAdvisor::default().advise(None, 100_000.0);
        assert_eq!(advice.suggestion, Suggestion::Wait);
    }

    #[test]
    fn uptrend_within_budget_invests() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let advice = SmaAdvisor::default().advise(Some(&series(&closes)), 10_000.0);
        assert!(advice.sma.is_some());
        assert_eq!(advice.suggestion, Suggestion::Invest);
    }

    #[test]
    fn price_well_below_sma_waits() {
        let mut closes = vec![100.0; 19];
        closes.push(80.0);
        let advice = SmaAdvisor::default().advise(Some(&series(&closes)), 10_000.0);
        // sma = 99.0, 80 < 94.05
        assert_eq!(advice.sma, Some(99.0));
        assert_eq!(advice.suggestion, Suggestion::Wait);
    }

    #[test]
    fn price_inside_tolerance_band_invests() {
        let mut closes = vec![100.0; 19];
        closes.push(96.0);
        let advice = SmaAdvisor::default().advise(Some(&series(&closes)), 10_000.0);
        assert_eq!(advice.suggestion, Suggestion::Invest);
    }

    #[test]
    fn unaffordable_share_waits() {
        let closes = vec![3500.0; 20];
        let advice = SmaAdvisor::default().advise(Some(&series(&closes)), 3000.0);
        assert_eq!(advice.suggestion, Suggestion::Wait);
        let advice = SmaAdvisor::default().advise(Some(&series(&closes)), 3400.0);
        assert_eq!(advice.suggestion, Suggestion::Invest);
    }
}
