//! Price history access: batch fetch, shape normalization, TTL caching.
//!
//! Every provider failure is converted into a [`MissingSymbol`] entry on the
//! returned [`HistoryReport`]; nothing here returns an error to the caller.

use super::cache::{CacheKey, TtlCache};
use super::provider::{DataError, MarketDataProvider};
use super::shape::normalize_frame;
use crate::domain::{PriceSeries, Symbol};
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Lookback window for a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryWindow {
    /// The last `n` calendar days, ending today.
    LastDays(u32),
    /// Explicit inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
}

impl HistoryWindow {
    /// Resolve to an inclusive `(start, end)` pair relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            HistoryWindow::LastDays(n) => (today - ChronoDuration::days(i64::from(n)), today),
            HistoryWindow::Range { start, end } if start <= end => (start, end),
            HistoryWindow::Range { start, end } => (end, start),
        }
    }
}

/// A requested symbol that produced no usable series.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingSymbol {
    pub symbol: Symbol,
    pub reason: DataError,
}

/// Outcome of a history request: series that were found, and why the rest were not.
#[derive(Debug, Clone, Default)]
pub struct HistoryReport {
    pub series: BTreeMap<Symbol, PriceSeries>,
    pub missing: Vec<MissingSymbol>,
    pub from_cache: bool,
}

impl HistoryReport {
    fn build(
        requested: &[Symbol],
        series: BTreeMap<Symbol, PriceSeries>,
        batch_error: Option<DataError>,
        from_cache: bool,
    ) -> Self {
        let missing = requested
            .iter()
            .filter(|s| !series.contains_key(*s))
            .map(|s| MissingSymbol {
                symbol: s.clone(),
                reason: batch_error.clone().unwrap_or(DataError::NoData),
            })
            .collect();
        Self {
            series,
            missing,
            from_cache,
        }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }
}

/// Fetches per-symbol price series through a provider, with caching.
pub struct PriceHistory {
    provider: Box<dyn MarketDataProvider>,
    cache: TtlCache<BTreeMap<Symbol, PriceSeries>>,
}

impl PriceHistory {
    pub fn new(provider: Box<dyn MarketDataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: TtlCache::new(ttl),
        }
    }

    /// Fetch history for `symbols` over `window`, ending today.
    pub fn fetch(&self, symbols: &[Symbol], window: HistoryWindow) -> HistoryReport {
        self.fetch_as_of(symbols, window, chrono::Local::now().date_naive())
    }

    /// Fetch history with an explicit notion of "today".
    pub fn fetch_as_of(
        &self,
        symbols: &[Symbol],
        window: HistoryWindow,
        today: NaiveDate,
    ) -> HistoryReport {
        if symbols.is_empty() {
            return HistoryReport::default();
        }

        let (start, end) = window.bounds(today);
        let key = cache_key(symbols, start, end);

        if let Some(series) = self.cache.get(&key) {
            tracing::debug!(symbols = symbols.len(), "price history cache hit");
            return HistoryReport::build(symbols, series, None, true);
        }

        if !self.provider.is_available() {
            tracing::warn!(
                provider = self.provider.name(),
                "provider unavailable; no prices fetched"
            );
            return HistoryReport::build(
                symbols,
                BTreeMap::new(),
                Some(DataError::CircuitBreakerTripped),
                false,
            );
        }

        match self.provider.fetch(symbols, start, end) {
            Ok(frame) => {
                let series = normalize_frame(symbols, frame);
                tracing::debug!(
                    provider = self.provider.name(),
                    requested = symbols.len(),
                    received = series.len(),
                    %start,
                    %end,
                    "fetched price history"
                );
                if !series.is_empty() {
                    self.cache.put(key, series.clone());
                }
                HistoryReport::build(symbols, series, None, false)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "price history batch failed"
                );
                HistoryReport::build(symbols, BTreeMap::new(), Some(e), false)
            }
        }
    }
}

fn cache_key(symbols: &[Symbol], start: NaiveDate, end: NaiveDate) -> CacheKey {
    let start = start.to_string();
    let end = end.to_string();
    let mut args: Vec<&[u8]> = symbols.iter().map(|s| s.as_str().as_bytes()).collect();
    args.push(start.as_bytes());
    args.push(end.as_bytes());
    CacheKey::new("price_history", &args)
}
