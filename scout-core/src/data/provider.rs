//! Provider traits and structured error types.
//!
//! `MarketDataProvider` abstracts over price sources (Yahoo Finance, fixtures
//! in tests) and `MembershipProvider` over index constituent lists. Both
//! return explicit `Result`s; callers decide how a failure degrades.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::Symbol;

/// Daily close as reported by a provider, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawClose {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Structured error types for data operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {context}")]
    HttpStatus { status: u16, context: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data in requested window")]
    NoData,

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("unknown universe: {0}")]
    UnknownUniverse(String),

    #[error("data error: {0}")]
    Other(String),
}

/// The two result shapes a price provider can hand back.
///
/// A batch request for one symbol may come back as a flat series with no
/// key; a request for several symbols comes back keyed by ticker. Only
/// [`crate::data::shape::normalize_frame`] looks inside this type.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderFrame {
    Single(Vec<RawClose>),
    Keyed(BTreeMap<String, Vec<RawClose>>),
}

/// Source of daily close prices.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a batch of symbols over an inclusive date range.
    ///
    /// Implementations drop symbols that fail individually and only return
    /// `Err` when the whole batch could not be attempted.
    fn fetch(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderFrame, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}

/// Source of index membership lists.
pub trait MembershipProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Raw (un-normalized) tickers of the named index.
    fn fetch(&self, universe: &str) -> Result<Vec<String>, DataError>;
}
