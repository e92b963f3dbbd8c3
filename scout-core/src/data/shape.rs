//! Shape detection for provider results.
//!
//! Converts a [`ProviderFrame`] of either shape into one [`PriceSeries`] per
//! requested symbol. Symbols without a usable close are left out.

use std::collections::BTreeMap;

use super::provider::{ProviderFrame, RawClose};
use crate::domain::{PricePoint, PriceSeries, Symbol};

/// Normalize a provider frame into per-symbol series.
///
/// - `Single` is attributed to the sole requested symbol. When more than one
///   symbol was requested the frame is ambiguous and is discarded.
/// - `Keyed` entries are matched to requested symbols case-insensitively;
///   keys that were not requested are ignored.
pub fn normalize_frame(
    requested: &[Symbol],
    frame: ProviderFrame,
) -> BTreeMap<Symbol, PriceSeries> {
    let mut out = BTreeMap::new();

    match frame {
        ProviderFrame::Single(closes) => match requested {
            [only] => {
                if let Some(series) = to_series(closes) {
                    out.insert(only.clone(), series);
                }
            }
            _ => {
                tracing::warn!(
                    requested = requested.len(),
                    "provider returned a single unkeyed series for a multi-symbol request; discarding"
                );
            }
        },
        ProviderFrame::Keyed(map) => {
            for (key, closes) in map {
                let Some(symbol) = requested
                    .iter()
                    .find(|s| s.as_str().eq_ignore_ascii_case(&key))
                else {
                    tracing::debug!(key = %key, "ignoring unrequested symbol in provider result");
                    continue;
                };
                if let Some(series) = to_series(closes) {
                    out.insert(symbol.clone(), series);
                }
            }
        }
    }

    out
}

fn to_series(closes: Vec<RawClose>) -> Option<PriceSeries> {
    PriceSeries::from_points(
        closes
            .into_iter()
            .map(|c| PricePoint::new(c.date, c.close)),
    )
}
