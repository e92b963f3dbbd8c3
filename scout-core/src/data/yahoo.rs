//! Yahoo Finance price provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API, one request per symbol,
//! with a bounded request timeout, retries with exponential backoff and a
//! shared circuit breaker. Symbols in a batch are fetched in parallel. A
//! failing symbol is dropped from the batch; the batch only fails as a whole
//! when nothing could be fetched.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, MarketDataProvider, ProviderFrame, RawClose};
use crate::domain::Symbol;
use chrono::{NaiveDate, NaiveTime};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

/// Connection settings for [`YahooProvider`].
#[derive(Debug, Clone)]
pub struct YahooSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub user_agent: String,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Longest pause between two retries.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Exponential backoff before retry `attempt` (1-based), capped at
/// [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    settings: YahooSettings,
}

impl YahooProvider {
    pub fn new(
        settings: YahooSettings,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            settings,
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{}/v8/finance/chart/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawClose>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // No timestamps means no trading days in the window.
        let Some(timestamps) = data.timestamp else {
            return Err(DataError::NoData);
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let mut closes = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;
            closes.push(RawClose {
                date,
                close: quote.close.get(i).copied().flatten(),
            });
        }

        if closes.iter().all(|c| c.close.is_none()) {
            return Err(DataError::NoData);
        }

        Ok(closes)
    }

    fn fetch_one(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawClose>, DataError> {
        let url = self.chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                std::thread::sleep(backoff_delay(self.settings.base_delay, attempt));
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status.is_server_error() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::HttpStatus {
                    status: status.as_u16(),
                    context: symbol.to_string(),
                });
                continue;
            }

            if !status.is_success() {
                return Err(DataError::HttpStatus {
                    status: status.as_u16(),
                    context: symbol.to_string(),
                });
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            })?;

            let closes = Self::parse_response(symbol, chart)?;
            self.circuit_breaker.record_success();
            return Ok(closes);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderFrame, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        // Requests fan out over rayon; each one still checks the shared breaker,
        // so a ban mid-batch stops the remaining requests.
        let results: Vec<(&Symbol, Result<Vec<RawClose>, DataError>)> = symbols
            .par_iter()
            .map(|symbol| (symbol, self.fetch_one(symbol.as_str(), start, end)))
            .collect();

        let mut keyed = BTreeMap::new();
        let mut last_error = None;

        for (symbol, result) in results {
            match result {
                Ok(closes) => {
                    keyed.insert(symbol.as_str().to_string(), closes);
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "price fetch failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if keyed.is_empty() => Err(e),
            _ => Ok(ProviderFrame::Keyed(keyed)),
        }
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
