//! Table export: CSV for spreadsheets, JSON for tooling.
//!
//! The CSV has a header row and no index column. Missing values are written
//! as empty cells. SMA columns appear only when the table carries suggestions.

use std::path::Path;

use anyhow::{Context, Result};

use crate::table::ScoutTable;

pub const BASE_COLUMNS: [&str; 6] = [
    "Stock",
    "Ticker",
    "Current Price (₹)",
    "Predicted Return (%)",
    "Projected Value (₹)",
    "Confidence (%)",
];

pub const SMA_COLUMNS: [&str; 2] = ["SMA20 (₹)", "Suggestion"];

/// Default download name, e.g. `stock_scout_1mo.csv`.
pub fn default_csv_name(horizon_label: &str) -> String {
    format!("stock_scout_{horizon_label}.csv")
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Render the table as CSV.
pub fn export_csv(table: &ScoutTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    if table.has_suggestions {
        header.extend(SMA_COLUMNS);
    }
    wtr.write_record(&header)?;

    for ranked in &table.rows {
        let r = &ranked.row;
        let mut record = vec![
            r.name.clone(),
            r.symbol.to_string(),
            money(r.latest_price),
            format!("{:.2}", r.return_pct),
            money(r.projected_value),
            r.confidence.to_string(),
        ];
        if table.has_suggestions {
            record.push(money(r.sma20));
            record.push(r.suggestion.map(|s| s.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write the CSV rendering to `path`.
pub fn write_csv(table: &ScoutTable, path: &Path) -> Result<()> {
    let csv = export_csv(table)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Serialize the table to pretty JSON.
pub fn export_json(table: &ScoutTable) -> Result<String> {
    serde_json::to_string_pretty(table).context("failed to serialize table to JSON")
}

/// Write the JSON rendering to `path`.
pub fn write_json(table: &ScoutTable, path: &Path) -> Result<()> {
    let json = export_json(table)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
