//! Return strategies and per-symbol row evaluation.
//!
//! A strategy turns `(symbol, horizon, optional history)` into a return
//! percentage. The evaluator wraps a strategy with the projected value,
//! the confidence placeholder and (optionally) the SMA advisor.

pub mod advisor;
pub mod evaluate;
pub mod mock;
pub mod momentum;
pub mod projection;

pub use advisor::{SmaAdvice, SmaAdvisor, DEFAULT_SMA_WINDOW, DEFAULT_TOLERANCE};
pub use evaluate::Evaluator;
pub use mock::{clip_band, MockReturn};
pub use momentum::Momentum;
pub use projection::{projected_value, ConfidenceRange};

use crate::domain::{Horizon, PriceSeries, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Produces a predicted return percentage for one symbol.
pub trait ReturnStrategy: Send + Sync {
    /// Short identifier (e.g., "momentum").
    fn name(&self) -> &str;

    /// Whether `return_pct` reads the price series. Strategies that don't
    /// only need the latest quote.
    fn needs_history(&self) -> bool;

    /// Return in percent, rounded to 2 decimals. `None` when undefined for
    /// the given inputs; such symbols are left out of the table.
    fn return_pct(
        &self,
        symbol: &Symbol,
        horizon: Horizon,
        series: Option<&PriceSeries>,
    ) -> Option<f64>;
}

/// Round half away from zero to 2 decimals. Values that round to zero come
/// back as `+0.0`.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0 + 0.0
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected mock, momentum or sma)")]
pub struct StrategyParseError(pub String);

/// Selectable strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Synthetic seeded draw.
    #[default]
    Mock,
    /// Realized return over the horizon window.
    Momentum,
    /// Momentum return plus the SMA20 Invest/Wait suggestion.
    Sma,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Mock, StrategyKind::Momentum, StrategyKind::Sma];

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Mock => "mock",
            StrategyKind::Momentum => "momentum",
            StrategyKind::Sma => "sma",
        }
    }

    /// Build the return strategy behind this kind.
    pub fn build(self) -> Box<dyn ReturnStrategy> {
        match self {
            StrategyKind::Mock => Box::new(MockReturn::default()),
            StrategyKind::Momentum | StrategyKind::Sma => Box::new(Momentum),
        }
    }

    pub fn uses_sma(self) -> bool {
        matches!(self, StrategyKind::Sma)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.label() == wanted)
            .ok_or_else(|| StrategyParseError(s.to_string()))
    }
}
