//! Builds one [`EvaluationRow`] per symbol.

use super::{round2, ConfidenceRange, ReturnStrategy, SmaAdvisor, StrategyKind};
use crate::domain::{EvaluationRow, Horizon, PriceSeries, Symbol};
use crate::strategy::projection::projected_value;

/// Strategy plus the per-row decorations (projection, confidence, SMA).
pub struct Evaluator {
    strategy: Box<dyn ReturnStrategy>,
    advisor: Option<SmaAdvisor>,
    confidence: ConfidenceRange,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("strategy", &self.strategy.name())
            .field("advisor", &self.advisor)
            .field("confidence", &self.confidence)
            .finish()
    }
}

impl Evaluator {
    pub fn new(strategy: Box<dyn ReturnStrategy>) -> Self {
        Self {
            strategy,
            advisor: None,
            confidence: ConfidenceRange::default(),
        }
    }

    /// Evaluator for a selectable kind; `Sma` gets the default advisor.
    pub fn for_kind(kind: StrategyKind) -> Self {
        let evaluator = Self::new(kind.build());
        if kind.uses_sma() {
            evaluator.with_advisor(SmaAdvisor::default())
        } else {
            evaluator
        }
    }

    pub fn with_advisor(mut self, advisor: SmaAdvisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceRange) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn needs_history(&self) -> bool {
        self.strategy.needs_history() || self.advisor.is_some()
    }

    pub fn advisor(&self) -> Option<&SmaAdvisor> {
        self.advisor.as_ref()
    }

    /// Evaluate one symbol. `None` when the strategy can't produce a return,
    /// e.g. a history-based strategy with no usable series.
    pub fn evaluate(
        &self,
        symbol: &Symbol,
        horizon: Horizon,
        investment: f64,
        series: Option<&PriceSeries>,
    ) -> Option<EvaluationRow> {
        let return_pct = self.strategy.return_pct(symbol, horizon, series)?;
        let latest_price = series.and_then(PriceSeries::latest).map(round2);
        let projected_value = projected_value(investment, latest_price, return_pct);

        let (sma20, suggestion) = match &self.advisor {
            Some(advisor) => {
                let advice = advisor.advise(series, investment);
                (advice.sma.map(round2), Some(advice.suggestion))
            }
            None => (None, None),
        };

        Some(EvaluationRow {
            symbol: symbol.clone(),
            name: symbol.base().to_string(),
            latest_price,
            return_pct,
            projected_value,
            confidence: self.confidence.score(symbol.as_str()),
            sma20,
            suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricePoint, Suggestion};
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        PriceSeries::from_points(closes.iter().enumerate().map(|(i, c)| {
            PricePoint::new(base + chrono::Duration::days(i as i64), Some(*c))
        }))
        .unwrap()
    }

    #[test]
    fn mock_row_without_quote_keeps_return() {
        let sym = Symbol::nse("TCS").unwrap();
        let row = Evaluator::for_kind(StrategyKind::Mock)
            .evaluate(&sym, Horizon::Days7, 100_000.0, None)
            .unwrap();
        assert_eq!(row.name, "TCS");
        assert_eq!(row.latest_price, None);
        assert_eq!(row.projected_value, None);
        assert!((65..=95).contains(&row.confidence));
        assert_eq!(row.suggestion, None);
    }

    #[test]
    fn momentum_row_without_history_is_skipped() {
        let sym = Symbol::nse("TCS").unwrap();
        let row = Evaluator::for_kind(StrategyKind::Momentum).evaluate(
            &sym,
            Horizon::Month1,
            100_000.0,
            None,
        );
        assert!(row.is_none());
    }

    #[test]
    fn momentum_row_projects_with_momentum_return() {
        let sym = Symbol::nse("TCS").unwrap();
        let s = series(&[3426.26, 3450.0, 3500.0]);
        let row = Evaluator::for_kind(StrategyKind::Momentum)
            .evaluate(&sym, Horizon::Days7, 100_000.0, Some(&s))
            .unwrap();
        assert_eq!(row.latest_price, Some(3500.0));
        assert_eq!(row.return_pct, 2.15);
        assert_eq!(row.projected_value, Some(102_150.0));
    }

    #[test]
    fn sma_row_with_short_history_waits() {
        let sym = Symbol::nse("INFY").unwrap();
        let s = series(&[1500.0; 10]);
        let row = Evaluator::for_kind(StrategyKind::Sma)
            .evaluate(&sym, Horizon::Days7, 100_000.0, Some(&s))
            .unwrap();
        assert_eq!(row.sma20, None);
        assert_eq!(row.suggestion, Some(Suggestion::Wait));
    }

    #[test]
    fn needs_history_reflects_strategy() {
        assert!(!Evaluator::for_kind(StrategyKind::Mock).needs_history());
        assert!(Evaluator::for_kind(StrategyKind::Momentum).needs_history());
        assert!(Evaluator::for_kind(StrategyKind::Sma).advisor().is_some());
    }
}
