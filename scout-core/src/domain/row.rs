//! Per-symbol evaluation output.

use super::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign bucket of the return column, used for downstream styling.
///
/// Zero is `NonNegative`; there is no neutral bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignClass {
    Negative,
    NonNegative,
}

impl SignClass {
    pub fn of(return_pct: f64) -> Self {
        if return_pct < 0.0 {
            SignClass::Negative
        } else {
            SignClass::NonNegative
        }
    }
}

/// Decision produced by the SMA advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suggestion {
    Invest,
    Wait,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Invest => f.write_str("Invest"),
            Suggestion::Wait => f.write_str("Wait"),
        }
    }
}

/// One row of the scanner table.
///
/// Invariant: `projected_value` is `Some` only when `latest_price` is present
/// and positive. `confidence` is always within `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub symbol: Symbol,
    pub name: String,
    pub latest_price: Option<f64>,
    pub return_pct: f64,
    pub projected_value: Option<f64>,
    pub confidence: u8,
    pub sma20: Option<f64>,
    pub suggestion: Option<Suggestion>,
}

impl EvaluationRow {
    /// Penny-stock inclusion flag. A row without a price never qualifies.
    pub fn is_penny(&self, threshold: f64) -> bool {
        self.latest_price.is_some_and(|p| p < threshold)
    }

    pub fn sign(&self) -> SignClass {
        SignClass::of(self.return_pct)
    }
}
