//! Universe resolution: named index universes and custom ticker lists.
//!
//! Named universes are fetched from a [`MembershipProvider`] and cached. Any
//! fetch failure falls back to a built-in static list, so resolution always
//! succeeds, possibly with a short or empty list.

use super::cache::{CacheKey, TtlCache};
use super::provider::MembershipProvider;
use crate::domain::{Symbol, DEFAULT_EXCHANGE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Index name used by the membership provider for the NIFTY 100.
pub const NIFTY100: &str = "NIFTY 100";

/// Static NIFTY 100 constituents used when the live list is unavailable.
pub const NIFTY100_FALLBACK: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "ICICIBANK", "INFY", "ITC", "LT", "SBIN", "BHARTIARTL",
    "BAJFINANCE", "HINDUNILVR", "AXISBANK", "KOTAKBANK", "MARUTI", "SUNPHARMA", "HCLTECH",
    "ASIANPAINT", "TITAN", "ULTRACEMCO", "NESTLEIND", "WIPRO", "ONGC", "TATAMOTORS", "POWERGRID",
    "NTPC", "M&M", "ADANIENT", "ADANIPORTS", "JSWSTEEL", "TATASTEEL", "TECHM", "HDFCLIFE",
    "SBILIFE", "GRASIM", "COALINDIA", "BAJAJFINSV", "LTIM", "BRITANNIA", "BPCL", "CIPLA",
    "DIVISLAB", "HEROMOTOCO", "HINDALCO", "IOC", "INDUSINDBK", "DRREDDY", "BAJAJ-AUTO", "UPL",
    "EICHERMOT", "APOLLOHOSP", "TATACONSUM", "DLF", "PIDILITIND", "ICICIPRULI", "ICICIGI",
    "HAVELLS", "COLPAL", "NAUKRI", "LTTS", "MCDOWELL-N", "ADANIGREEN", "ABB", "BANKBARODA", "BEL",
    "BIOCON", "CHOLAFIN", "DABUR", "GAIL", "GODREJCP", "HINDPETRO", "INDIGO", "LICI",
    "MUTHOOTFIN", "PAGEIND", "PETRONET", "PIIND", "PNB", "RECLTD", "SBICARD", "SHREECEM",
    "SIEMENS", "SRF", "TATAPOWER", "TORNTPHARM", "TVSMOTOR", "VOLTAS", "ZOMATO", "JKCEMENT",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown universe '{0}' (valid: nifty100, penny, both, or a comma-separated ticker list)")]
pub struct UniverseParseError(pub String);

/// Which symbols to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniverseId {
    Nifty100,
    /// NIFTY 100 membership restricted to prices below the penny threshold.
    PennyStocks,
    /// NIFTY 100 membership with no price restriction.
    Both,
    /// Free-text, comma-separated ticker list.
    Custom(String),
}

impl UniverseId {
    /// Membership index backing a named universe.
    pub fn index_name(&self) -> Option<&'static str> {
        match self {
            UniverseId::Nifty100 | UniverseId::PennyStocks | UniverseId::Both => Some(NIFTY100),
            UniverseId::Custom(_) => None,
        }
    }

    pub fn implies_penny_filter(&self) -> bool {
        matches!(self, UniverseId::PennyStocks)
    }
}

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniverseId::Nifty100 => f.write_str("NIFTY 100"),
            UniverseId::PennyStocks => f.write_str("Penny Stocks"),
            UniverseId::Both => f.write_str("Both"),
            UniverseId::Custom(list) => write!(f, "Custom ({list})"),
        }
    }
}

impl FromStr for UniverseId {
    type Err = UniverseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "nifty100" => Ok(UniverseId::Nifty100),
            "penny" | "pennystocks" => Ok(UniverseId::PennyStocks),
            "both" => Ok(UniverseId::Both),
            _ if s.contains(',') => Ok(UniverseId::Custom(s.to_string())),
            _ => Err(UniverseParseError(s.to_string())),
        }
    }
}

/// A universe plus its optional price filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseSpec {
    pub id: UniverseId,
    pub penny_filter: bool,
}

impl UniverseSpec {
    pub fn new(id: UniverseId, penny_filter: bool) -> Self {
        Self { id, penny_filter }
    }

    /// Whether the penny filter applies, either requested or implied by the universe.
    pub fn penny_filter_active(&self) -> bool {
        self.penny_filter || self.id.implies_penny_filter()
    }
}

/// Split free text on commas and normalize each token.
pub fn parse_custom(input: &str, suffix: &str) -> Vec<Symbol> {
    dedup(input.split(',').filter_map(|t| Symbol::normalize(t, suffix)))
}

/// Drop repeated symbols, keeping the first occurrence.
fn dedup(symbols: impl IntoIterator<Item = Symbol>) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Produces canonical symbol lists for a [`UniverseId`].
pub struct UniverseResolver {
    membership: Box<dyn MembershipProvider>,
    fallbacks: BTreeMap<String, Vec<String>>,
    cache: TtlCache<Vec<String>>,
    suffix: String,
}

impl UniverseResolver {
    pub fn new(membership: Box<dyn MembershipProvider>, ttl: Duration) -> Self {
        let mut fallbacks = BTreeMap::new();
        fallbacks.insert(
            NIFTY100.to_string(),
            NIFTY100_FALLBACK.iter().map(|s| s.to_string()).collect(),
        );
        Self {
            membership,
            fallbacks,
            cache: TtlCache::new(ttl),
            suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
        }
    }

    /// Replace the built-in fallback list for an index.
    pub fn with_fallback(mut self, index: &str, tickers: Vec<String>) -> Self {
        self.fallbacks.insert(index.to_string(), tickers);
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Resolve a universe into a deduplicated, order-preserving symbol list.
    /// Never fails.
    pub fn resolve(&self, id: &UniverseId) -> Vec<Symbol> {
        match id {
            UniverseId::Custom(list) => parse_custom(list, &self.suffix),
            named => {
                let Some(index) = named.index_name() else {
                    return Vec::new();
                };
                let raw = self.membership_for(index);
                dedup(raw.iter().filter_map(|t| Symbol::normalize(t, &self.suffix)))
            }
        }
    }

    fn membership_for(&self, index: &str) -> Vec<String> {
        let key = CacheKey::new("membership", &[index.as_bytes()]);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(index, count = cached.len(), "membership cache hit");
            return cached;
        }

        match self.membership.fetch(index) {
            Ok(list) if !list.is_empty() => {
                tracing::debug!(
                    index,
                    provider = self.membership.name(),
                    count = list.len(),
                    "fetched index membership"
                );
                self.cache.put(key, list.clone());
                list
            }
            Ok(_) => {
                tracing::warn!(index, "membership provider returned an empty list; using fallback");
                self.fallback_for(index)
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "membership fetch failed; using fallback");
                self.fallback_for(index)
            }
        }
    }

    fn fallback_for(&self, index: &str) -> Vec<String> {
        self.fallbacks.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticMembership {
        result: Result<Vec<String>, DataError>,
        calls: Arc<AtomicUsize>,
    }

    impl MembershipProvider for StaticMembership {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch(&self, _universe: &str) -> Result<Vec<String>, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn resolver(result: Result<Vec<String>, DataError>) -> (UniverseResolver, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = StaticMembership {
            result,
            calls: calls.clone(),
        };
        (
            UniverseResolver::new(Box::new(provider), Duration::from_secs(3600)),
            calls,
        )
    }

    #[test]
    fn custom_list_is_trimmed_deduped_and_normalized() {
        let (r, calls) = resolver(Err(DataError::NoData));
        let got = r.resolve(&UniverseId::Custom(" tcs, infy,,TCS.NS , m&m ".into()));
        let names: Vec<&str> = got.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["TCS.NS", "INFY.NS", "MANDM.NS"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn custom_list_skips_bare_suffix_tokens() {
        let got = parse_custom("TCS,.NS, .bo", DEFAULT_EXCHANGE_SUFFIX);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].base(), "TCS");
    }

    #[test]
    fn live_membership_is_used_and_cached() {
        let (r, calls) = resolver(Ok(vec!["TCS".into(), "INFY".into(), "TCS".into()]));
        let first = r.resolve(&UniverseId::Nifty100);
        let second = r.resolve(&UniverseId::Both);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_falls_back_to_static_list() {
        let (r, _) = resolver(Err(DataError::NetworkUnreachable("offline".into())));
        let got = r.resolve(&UniverseId::Nifty100);
        assert_eq!(got.len(), NIFTY100_FALLBACK.len());
        assert_eq!(got[0].as_str(), "RELIANCE.NS");
        assert!(got.iter().any(|s| s.as_str() == "MANDM.NS"));
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let (r, calls) = resolver(Err(DataError::NoData));
        r.resolve(&UniverseId::Nifty100);
        r.resolve(&UniverseId::Nifty100);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_fallback_resolves_to_nothing() {
        let (r, _) = resolver(Err(DataError::NoData));
        let r = r.with_fallback(NIFTY100, Vec::new());
        assert!(r.resolve(&UniverseId::PennyStocks).is_empty());
    }

    #[test]
    fn parses_universe_names() {
        assert_eq!("NIFTY 100".parse::<UniverseId>().unwrap(), UniverseId::Nifty100);
        assert_eq!("penny".parse::<UniverseId>().unwrap(), UniverseId::PennyStocks);
        assert_eq!("Both".parse::<UniverseId>().unwrap(), UniverseId::Both);
        assert_eq!(
            "TCS, INFY".parse::<UniverseId>().unwrap(),
            UniverseId::Custom("TCS, INFY".into())
        );
        assert!("sensex".parse::<UniverseId>().is_err());
    }

    #[test]
    fn penny_universe_implies_filter() {
        assert!(UniverseSpec::new(UniverseId::PennyStocks, false).penny_filter_active());
        assert!(!UniverseSpec::new(UniverseId::Both, false).penny_filter_active());
        assert!(UniverseSpec::new(UniverseId::Nifty100, true).penny_filter_active());
    }
}
