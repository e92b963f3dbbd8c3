//! Prediction horizons offered by the scanner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown horizon '{0}' (valid: 7d, 15d, 1mo, 3mo, 6mo, 12mo, 3y, 5y)")]
pub struct HorizonParseError(pub String);

/// Forward-looking window over which a return is projected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    #[default]
    Days7,
    Days15,
    Month1,
    Months3,
    Months6,
    Months12,
    Years3,
    Years5,
}

impl Horizon {
    pub const ALL: [Horizon; 8] = [
        Horizon::Days7,
        Horizon::Days15,
        Horizon::Month1,
        Horizon::Months3,
        Horizon::Months6,
        Horizon::Months12,
        Horizon::Years3,
        Horizon::Years5,
    ];

    /// Calendar-day length of the horizon.
    pub fn days(self) -> u32 {
        match self {
            Horizon::Days7 => 7,
            Horizon::Days15 => 15,
            Horizon::Month1 => 30,
            Horizon::Months3 => 90,
            Horizon::Months6 => 180,
            Horizon::Months12 => 365,
            Horizon::Years3 => 1095,
            Horizon::Years5 => 1825,
        }
    }

    /// Short label, e.g. `1mo`.
    pub fn label(self) -> &'static str {
        match self {
            Horizon::Days7 => "7d",
            Horizon::Days15 => "15d",
            Horizon::Month1 => "1mo",
            Horizon::Months3 => "3mo",
            Horizon::Months6 => "6mo",
            Horizon::Months12 => "12mo",
            Horizon::Years3 => "3y",
            Horizon::Years5 => "5y",
        }
    }

    /// Long label as shown on the period slider, e.g. `1 month`.
    pub fn long_label(self) -> &'static str {
        match self {
            Horizon::Days7 => "7 days",
            Horizon::Days15 => "15 days",
            Horizon::Month1 => "1 month",
            Horizon::Months3 => "3 months",
            Horizon::Months6 => "6 months",
            Horizon::Months12 => "12 months",
            Horizon::Years3 => "3 years",
            Horizon::Years5 => "5 years",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = HorizonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Horizon::ALL
            .into_iter()
            .find(|h| h.label() == wanted || h.long_label() == wanted)
            .ok_or_else(|| HorizonParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_table_matches_slider() {
        let days: Vec<u32> = Horizon::ALL.iter().map(|h| h.days()).collect();
        assert_eq!(days, vec![7, 15, 30, 90, 180, 365, 1095, 1825]);
    }

    #[test]
    fn parses_short_and_long_labels() {
        assert_eq!("1mo".parse::<Horizon>().unwrap(), Horizon::Month1);
        assert_eq!("3 Years".parse::<Horizon>().unwrap(), Horizon::Years3);
        assert_eq!(" 7d ".parse::<Horizon>().unwrap(), Horizon::Days7);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "2w".parse::<Horizon>().unwrap_err();
        assert!(err.to_string().contains("2w"));
    }

    #[test]
    fn label_roundtrip() {
        for h in Horizon::ALL {
            assert_eq!(h.label().parse::<Horizon>().unwrap(), h);
        }
    }
}
