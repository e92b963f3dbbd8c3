//! Scanner table: penny filter, ranking, sign classes.
//!
//! Rows are ordered by suggestion (Invest before Wait) when the SMA advisor
//! ran, then by predicted return descending, then by symbol ascending. The
//! order is total: NaN returns sort via `f64::total_cmp` and never panic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use scout_core::domain::{EvaluationRow, SignClass};

pub const DEFAULT_PENNY_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    pub penny_filter: bool,
    /// Exclusive upper price bound for penny stocks.
    pub penny_threshold: f64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            penny_filter: false,
            penny_threshold: DEFAULT_PENNY_THRESHOLD,
        }
    }
}

/// One row of the final table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    /// 1-based position in the table.
    pub rank: usize,
    pub sign: SignClass,
    #[serde(flatten)]
    pub row: EvaluationRow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutTable {
    pub rows: Vec<RankedRow>,
    /// Whether rows carry SMA20 and a suggestion.
    pub has_suggestions: bool,
}

impl ScoutTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Message to show instead of an empty table.
    pub fn empty_warning(&self) -> Option<&'static str> {
        self.is_empty()
            .then_some("No stocks matched the current selection. Try another universe or horizon.")
    }
}

/// Filter, order and rank evaluated rows.
pub fn assemble(rows: Vec<EvaluationRow>, options: &TableOptions) -> ScoutTable {
    let mut rows: Vec<EvaluationRow> = if options.penny_filter {
        rows.into_iter()
            .filter(|r| r.is_penny(options.penny_threshold))
            .collect()
    } else {
        rows
    };

    let has_suggestions = rows.iter().any(|r| r.suggestion.is_some());
    rows.sort_by(compare_rows);

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| RankedRow {
            rank: i + 1,
            sign: row.sign(),
            row,
        })
        .collect();

    ScoutTable {
        rows,
        has_suggestions,
    }
}

/// Table order: suggestion (None last), return descending, symbol ascending.
/// `-0.0` and `0.0` compare equal.
pub fn compare_rows(a: &EvaluationRow, b: &EvaluationRow) -> Ordering {
    let suggestion = match (a.suggestion, b.suggestion) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    suggestion
        .then_with(|| (b.return_pct + 0.0).total_cmp(&(a.return_pct + 0.0)))
        .then_with(|| a.symbol.cmp(&b.symbol))
}
