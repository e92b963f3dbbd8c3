//! Export round trips through the filesystem.

use scout_core::domain::{EvaluationRow, Suggestion, Symbol};
use scout_runner::table::{assemble, TableOptions};
use scout_runner::{write_csv, write_json, ScoutTable};

fn row(sym: &str, price: Option<f64>, ret: f64, suggestion: Option<Suggestion>) -> EvaluationRow {
    let symbol = Symbol::nse(sym).unwrap();
    EvaluationRow {
        name: symbol.base().to_string(),
        symbol,
        latest_price: price,
        return_pct: ret,
        projected_value: price.map(|_| 100_000.0 * (1.0 + ret / 100.0)),
        confidence: 77,
        sma20: price,
        suggestion,
    }
}

#[test]
fn csv_file_reads_back_with_csv_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock_scout_7d.csv");
    let table = assemble(
        vec![
            row("M&M", Some(2890.5), 4.25, Some(Suggestion::Wait)),
            row("IDEA", Some(14.2), -1.5, Some(Suggestion::Invest)),
        ],
        &TableOptions::default(),
    );

    write_csv(&table, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 8);
    assert_eq!(&headers[0], "Stock");
    assert_eq!(&headers[7], "Suggestion");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    // Invest sorts first despite the lower return.
    assert_eq!(&records[0][1], "IDEA.NS");
    assert_eq!(&records[0][7], "Invest");
    assert_eq!(&records[1][0], "MANDM");
    assert_eq!(&records[1][2], "2890.50");
}

#[test]
fn json_file_deserializes_to_same_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.json");
    let table = assemble(
        vec![row("TCS", Some(3500.0), 2.15, None), row("ITC", None, -0.4, None)],
        &TableOptions::default(),
    );

    write_json(&table, &path).unwrap();

    let back: ScoutTable =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back.len(), 2);
    assert!(!back.has_suggestions);
    for (a, b) in back.rows.iter().zip(&table.rows) {
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.sign, b.sign);
        assert_eq!(a.row.symbol, b.row.symbol);
        assert_eq!(a.row.latest_price, b.row.latest_price);
        assert_eq!(a.row.return_pct, b.row.return_pct);
    }
}

#[test]
fn write_to_missing_directory_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.csv");
    let table = assemble(Vec::new(), &TableOptions::default());
    let err = write_csv(&table, &path).unwrap_err();
    assert!(format!("{err:#}").contains("out.csv"));
}
