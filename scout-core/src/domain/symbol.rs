//! Canonical exchange-qualified ticker symbols.
//!
//! The market-data provider expects NSE tickers in the form `RELIANCE.NS`.
//! User input and index membership files use bare names such as `M&M` or
//! `bajaj auto`, so every symbol passes through [`Symbol::normalize`] before
//! it reaches a provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix appended to bare tickers (National Stock Exchange of India).
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";

/// Exchange suffixes that already qualify a ticker.
const KNOWN_SUFFIXES: &[&str] = &[".NS", ".BO"];

/// Normalized, exchange-qualified ticker.
///
/// Normalization is idempotent: normalizing the string form of a `Symbol`
/// yields the same `Symbol`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize raw input into a canonical symbol.
    ///
    /// Removes all whitespace, uppercases, replaces `&` with `AND` and appends
    /// `suffix` unless the ticker already carries a known exchange suffix.
    /// Returns `None` when no ticker is left after cleanup, including input
    /// that is only a suffix.
    pub fn normalize(raw: &str, suffix: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
            .replace('&', "AND");

        if cleaned.is_empty() {
            return None;
        }

        let suffix = suffix.trim().to_uppercase();
        let bare = std::iter::once(suffix.as_str())
            .chain(KNOWN_SUFFIXES.iter().copied())
            .filter(|s| !s.is_empty())
            .find_map(|s| cleaned.strip_suffix(s));
        match bare {
            // A lone suffix names no ticker.
            Some("") => return None,
            Some(_) => return Some(Self(cleaned)),
            None if suffix.is_empty() => return Some(Self(cleaned)),
            None => {}
        }

        Some(Self(format!("{cleaned}{suffix}")))
    }

    /// Normalize with the default NSE suffix.
    pub fn nse(raw: &str) -> Option<Self> {
        Self::normalize(raw, DEFAULT_EXCHANGE_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticker without its exchange suffix, used as the display name.
    pub fn base(&self) -> &str {
        KNOWN_SUFFIXES
            .iter()
            .find_map(|s| self.0.strip_suffix(s))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix() {
        assert_eq!(Symbol::nse("tcs").unwrap().as_str(), "TCS.NS");
    }

    #[test]
    fn keeps_existing_suffix() {
        assert_eq!(Symbol::nse("INFY.NS").unwrap().as_str(), "INFY.NS");
        assert_eq!(Symbol::nse("infy.ns").unwrap().as_str(), "INFY.NS");
        assert_eq!(Symbol::nse("SBIN.BO").unwrap().as_str(), "SBIN.BO");
    }

    #[test]
    fn replaces_ampersand_and_whitespace() {
        assert_eq!(Symbol::nse("M&M").unwrap().as_str(), "MANDM.NS");
        assert_eq!(Symbol::nse(" bajaj  auto ").unwrap().as_str(), "BAJAJAUTO.NS");
    }

    #[test]
    fn hyphenated_tickers_survive() {
        assert_eq!(Symbol::nse("bajaj-auto").unwrap().as_str(), "BAJAJ-AUTO.NS");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(Symbol::nse("").is_none());
        assert!(Symbol::nse("   ").is_none());
    }

    #[test]
    fn bare_suffix_is_rejected() {
        assert!(Symbol::nse(".NS").is_none());
        assert!(Symbol::nse(" .ns ").is_none());
        assert!(Symbol::nse(".BO").is_none());
        assert!(Symbol::normalize(".XY", ".xy").is_none());
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Symbol::nse("l&t finance").unwrap();
        let twice = Symbol::nse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn base_strips_suffix() {
        assert_eq!(Symbol::nse("TCS").unwrap().base(), "TCS");
        assert_eq!(Symbol::nse("SBIN.BO").unwrap().base(), "SBIN");
    }

    #[test]
    fn custom_suffix() {
        let s = Symbol::normalize("reliance", ".bo").unwrap();
        assert_eq!(s.as_str(), "RELIANCE.BO");
    }
}
