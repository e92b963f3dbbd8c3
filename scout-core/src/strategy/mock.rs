//! Synthetic return draw.
//!
//! Models a random-walk price: volatility scales with the square root of the
//! horizon, with a small positive drift. The draw is seeded from the
//! `(symbol, horizon)` pair so the table is stable across refreshes.

use rand::distributions::Distribution;
use statrs::distribution::Normal;

use super::{round2, ReturnStrategy};
use crate::domain::{Horizon, PriceSeries, Symbol};
use crate::seed::mock_return_rng;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Horizons up to this many days use the tight clip band.
pub const SHORT_HORIZON_DAYS: u32 = 30;

/// Inclusive clip band in percent for a horizon length.
pub fn clip_band(days: u32) -> (f64, f64) {
    if days <= SHORT_HORIZON_DAYS {
        (-25.0, 25.0)
    } else {
        (-40.0, 60.0)
    }
}

#[derive(Debug, Clone)]
pub struct MockReturn {
    pub annual_vol: f64,
    pub annual_drift: f64,
}

impl Default for MockReturn {
    fn default() -> Self {
        Self {
            annual_vol: 0.28,
            annual_drift: 0.06,
        }
    }
}

impl MockReturn {
    /// Deterministic return percentage for `(symbol, days)`, rounded to 2 decimals.
    pub fn draw(&self, symbol: &str, days: u32) -> f64 {
        let days = days.max(1);
        let daily_vol = self.annual_vol / TRADING_DAYS_PER_YEAR.sqrt();
        let horizon_vol = daily_vol * f64::from(days).sqrt();
        let daily_drift = (1.0 + self.annual_drift).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0;
        let mean = daily_drift * f64::from(days);

        let ret = match Normal::new(mean, horizon_vol) {
            Ok(normal) => normal.sample(&mut mock_return_rng(symbol, days)),
            // Zero or non-finite volatility degenerates to the drift.
            Err(_) => mean,
        };

        let (lo, hi) = clip_band(days);
        round2((ret * 100.0).clamp(lo, hi))
    }
}

impl ReturnStrategy for MockReturn {
    fn name(&self) -> &str {
        "mock"
    }

    fn needs_history(&self) -> bool {
        false
    }

    fn return_pct(
        &self,
        symbol: &Symbol,
        horizon: Horizon,
        _series: Option<&PriceSeries>,
    ) -> Option<f64> {
        Some(self.draw(symbol.as_str(), horizon.days()))
    }
}
