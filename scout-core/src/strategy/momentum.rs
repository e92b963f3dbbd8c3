//! Realized momentum over the fetched window.

use super::{round2, ReturnStrategy};
use crate::domain::{Horizon, PriceSeries, Symbol};

/// `(latest / start - 1) * 100`, defined only when the start price is positive.
#[derive(Debug, Clone, Default)]
pub struct Momentum;

impl Momentum {
    pub fn compute(series: &PriceSeries) -> Option<f64> {
        let start = series.start().filter(|p| *p > 0.0)?;
        let latest = series.latest()?;
        Some(round2((latest / start - 1.0) * 100.0))
    }
}

impl ReturnStrategy for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn needs_history(&self) -> bool {
        true
    }

    fn return_pct(
        &self,
        _symbol: &Symbol,
        _horizon: Horizon,
        series: Option<&PriceSeries>,
    ) -> Option<f64> {
        series.and_then(Momentum::compute)
    }
}
