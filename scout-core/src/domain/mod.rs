//! Domain types for Stock Scout

pub mod horizon;
pub mod row;
pub mod series;
pub mod symbol;

pub use horizon::{Horizon, HorizonParseError};
pub use row::{EvaluationRow, SignClass, Suggestion};
pub use series::{PricePoint, PriceSeries};
pub use symbol::{Symbol, DEFAULT_EXCHANGE_SUFFIX};
