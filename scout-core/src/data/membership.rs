//! Index membership lists published by NSE.
//!
//! NSE publishes each index's constituents as a CSV file with a `Symbol`
//! column (`Company Name,Industry,Symbol,Series,ISIN Code`). The resolver
//! treats any failure here as recoverable and falls back to a built-in list.

use super::provider::{DataError, MembershipProvider};
use std::collections::BTreeMap;
use std::time::Duration;

pub const NIFTY100_CSV_URL: &str =
    "https://archives.nseindia.com/content/indices/ind_nifty100list.csv";

/// Downloads constituent CSVs over HTTP.
pub struct NseMembershipProvider {
    client: reqwest::blocking::Client,
    urls: BTreeMap<String, String>,
}

impl NseMembershipProvider {
    /// `urls` maps a universe name (e.g. `"NIFTY 100"`) to its CSV location.
    pub fn new(
        urls: BTreeMap<String, String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, urls })
    }
}

impl MembershipProvider for NseMembershipProvider {
    fn name(&self) -> &str {
        "nse_indices"
    }

    fn fetch(&self, universe: &str) -> Result<Vec<String>, DataError> {
        let url = self
            .urls
            .get(universe)
            .ok_or_else(|| DataError::UnknownUniverse(universe.to_string()))?;

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                context: url.clone(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("unreadable body: {e}")))?;
        parse_constituents(&body)
    }
}

/// Extract the `Symbol` column from a constituent CSV.
pub fn parse_constituents(body: &str) -> Result<Vec<String>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataError::ResponseFormatChanged(format!("bad CSV header: {e}")))?;
    let column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("symbol"))
        .ok_or_else(|| DataError::ResponseFormatChanged("no Symbol column".into()))?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| DataError::ResponseFormatChanged(format!("bad CSV row: {e}")))?;
        if let Some(sym) = record.get(column).filter(|s| !s.is_empty()) {
            symbols.push(sym.to_string());
        }
    }

    if symbols.is_empty() {
        return Err(DataError::ResponseFormatChanged(
            "constituent list is empty".into(),
        ));
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbol_column() {
        let body = "Company Name,Industry,Symbol,Series,ISIN Code\n\
                    Tata Consultancy Services Ltd.,Information Technology,TCS,EQ,INE467B01029\n\
                    Mahindra & Mahindra Ltd.,Automobile,M&M,EQ,INE101A01026\n";
        assert_eq!(parse_constituents(body).unwrap(), vec!["TCS", "M&M"]);
    }

    #[test]
    fn missing_symbol_column_is_format_error() {
        let body = "Company Name,Ticker\nTCS Ltd,TCS\n";
        assert!(matches!(
            parse_constituents(body),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn header_only_is_format_error() {
        assert!(parse_constituents("Symbol\n").is_err());
    }

    #[test]
    fn html_error_page_is_rejected() {
        assert!(parse_constituents("<html><body>Access Denied</body></html>").is_err());
    }

    #[test]
    fn unknown_universe_is_error() {
        let provider =
            NseMembershipProvider::new(BTreeMap::new(), Duration::from_secs(1), "test").unwrap();
        assert_eq!(
            provider.fetch("NIFTY 500"),
            Err(DataError::UnknownUniverse("NIFTY 500".into()))
        );
    }
}
