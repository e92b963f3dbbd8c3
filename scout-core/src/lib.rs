//! Stock Scout Core: domain types, market data access, return strategies.
//!
//! This crate contains everything below the scan pipeline:
//! - Domain types (symbols, price series, horizons, evaluation rows)
//! - Universe resolution with a static fallback list
//! - Price history access with shape normalization and a TTL cache
//! - Mock and momentum return strategies, projected value, confidence
//! - SMA20 Invest/Wait advisor

pub mod data;
pub mod domain;
pub mod indicators;
pub mod seed;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the pipeline shares across calls is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Symbol>();
        require_sync::<domain::Symbol>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::EvaluationRow>();
        require_sync::<domain::EvaluationRow>();
        require_send::<domain::Horizon>();
        require_sync::<domain::Horizon>();

        // Data access
        require_send::<data::PriceHistory>();
        require_sync::<data::PriceHistory>();
        require_send::<data::UniverseResolver>();
        require_sync::<data::UniverseResolver>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();

        // Strategies
        require_send::<strategy::Evaluator>();
        require_sync::<strategy::Evaluator>();
        require_send::<strategy::SmaAdvisor>();
        require_sync::<strategy::SmaAdvisor>();
    }

    /// Architecture contract: return strategies never see the investment amount.
    ///
    /// Investment only enters through projection and the advisor, so the
    /// predicted return of a symbol is independent of position size.
    #[test]
    fn return_strategy_has_no_investment_parameter() {
        fn _check_trait_object_builds(
            strategy: &dyn strategy::ReturnStrategy,
            symbol: &domain::Symbol,
            series: Option<&domain::PriceSeries>,
        ) -> Option<f64> {
            strategy.return_pct(symbol, domain::Horizon::Days7, series)
        }
    }
}
