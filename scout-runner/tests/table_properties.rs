//! Property tests for table assembly.
//!
//! 1. Rows are ordered by return descending, then symbol ascending, with
//!    signed zeros tying
//! 2. Ranks are 1..=n and sign classes match the return
//! 3. The penny filter keeps only priced rows strictly below the threshold

use proptest::prelude::*;
use scout_core::domain::{EvaluationRow, SignClass, Symbol};
use scout_runner::table::{assemble, TableOptions};

fn arb_row() -> impl Strategy<Value = EvaluationRow> {
    (
        "[A-Z]{1,6}",
        prop::option::weighted(0.9, (0.5..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)),
        prop_oneof![
            8 => (-40.0..60.0_f64).prop_map(|r| (r * 100.0).round() / 100.0),
            1 => Just(0.0),
            1 => Just(-0.0),
        ],
    )
        .prop_map(|(ticker, price, ret)| {
            let symbol = Symbol::nse(&ticker).unwrap();
            EvaluationRow {
                name: symbol.base().to_string(),
                symbol,
                latest_price: price,
                return_pct: ret,
                projected_value: None,
                confidence: 80,
                sma20: None,
                suggestion: None,
            }
        })
}

proptest! {
    #[test]
    fn ordering_is_return_desc_then_symbol(rows in prop::collection::vec(arb_row(), 0..40)) {
        let table = assemble(rows, &TableOptions::default());
        for pair in table.rows.windows(2) {
            let (a, b) = (&pair[0].row, &pair[1].row);
            prop_assert!(
                a.return_pct > b.return_pct
                    || (a.return_pct == b.return_pct && a.symbol <= b.symbol)
            );
        }
    }

    #[test]
    fn ranks_and_signs(rows in prop::collection::vec(arb_row(), 0..40)) {
        let n = rows.len();
        let table = assemble(rows, &TableOptions::default());
        prop_assert_eq!(table.len(), n);
        for (i, r) in table.rows.iter().enumerate() {
            prop_assert_eq!(r.rank, i + 1);
            let expected = if r.row.return_pct < 0.0 {
                SignClass::Negative
            } else {
                SignClass::NonNegative
            };
            prop_assert_eq!(r.sign, expected);
        }
    }

    #[test]
    fn penny_filter_keeps_only_cheap_priced_rows(
        rows in prop::collection::vec(arb_row(), 0..40),
        threshold in 1.0..500.0_f64,
    ) {
        let expected = rows
            .iter()
            .filter(|r| r.latest_price.is_some_and(|p| p < threshold))
            .count();
        let table = assemble(
            rows,
            &TableOptions { penny_filter: true, penny_threshold: threshold },
        );
        prop_assert_eq!(table.len(), expected);
        prop_assert!(table
            .rows
            .iter()
            .all(|r| r.row.latest_price.is_some_and(|p| p < threshold)));
    }
}
