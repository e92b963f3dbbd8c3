//! Close-price history for a single symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily observation. `close` is `None` when the provider reported no
/// usable price for that date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl PricePoint {
    /// Build a point, treating NaN, infinite and negative closes as missing.
    pub fn new(date: NaiveDate, close: Option<f64>) -> Self {
        let close = close.filter(|c| c.is_finite() && *c >= 0.0);
        Self { date, close }
    }
}

/// Date-ordered close prices for one symbol.
///
/// Invariant: at least one point carries a close price. Use
/// [`PriceSeries::from_points`] to construct; it sorts by date, collapses
/// duplicate dates (last observation wins) and refuses all-missing input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Option<Self> {
        let by_date: BTreeMap<NaiveDate, Option<f64>> = points
            .into_iter()
            .map(|p| {
                let p = PricePoint::new(p.date, p.close);
                (p.date, p.close)
            })
            .collect();

        if by_date.values().all(|c| c.is_none()) {
            return None;
        }

        let points = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        Some(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last chronological non-missing close.
    pub fn latest(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.close)
    }

    /// First chronological non-missing close.
    pub fn start(&self) -> Option<f64> {
        self.points.iter().find_map(|p| p.close)
    }

    /// Date of the latest non-missing close.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.points
            .iter()
            .rev()
            .find(|p| p.close.is_some())
            .map(|p| p.date)
    }

    /// Non-missing closes in date order.
    pub fn observations(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.close).collect()
    }
}
