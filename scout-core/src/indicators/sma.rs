//! Simple Moving Average (SMA).
//!
//! Trailing mean of close observations over a fixed window.

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    /// Trailing SMA over the most recent `period` observations.
    ///
    /// `None` when fewer than `period` observations exist.
    pub fn latest(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }
        let window = &closes[closes.len() - self.period..];
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_uses_trailing_window() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        // mean(12..=16) = 14
        assert_approx(Sma::new(5).latest(&closes).unwrap(), 14.0, DEFAULT_EPSILON);
        assert_approx(Sma::new(5).latest(&closes[..5]).unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_20_over_longer_history() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        // mean(11..=30) = 20.5
        assert_approx(Sma::new(20).latest(&closes).unwrap(), 20.5, DEFAULT_EPSILON);
    }

    #[test]
    fn too_few_observations() {
        let closes = [10.0; 19];
        assert!(Sma::new(20).latest(&closes).is_none());
        assert!(Sma::new(1).latest(&[]).is_none());
    }

    #[test]
    fn period_one_is_last_close() {
        assert_eq!(Sma::new(1).latest(&[3.0, 7.0]), Some(7.0));
    }
}
