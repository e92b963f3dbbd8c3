//! Scan pipeline: universe → price history → row evaluation → table.
//!
//! Runs synchronously on the caller's thread. Data failures degrade into
//! missing rows and are reported on [`ScanOutcome::missing`]; the only errors
//! a scan returns concern the session or the setup.

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use scout_core::data::{
    CircuitBreaker, DataError, HistoryWindow, MarketDataProvider, MembershipProvider,
    MissingSymbol, NseMembershipProvider, PriceHistory, UniverseId, UniverseResolver,
    YahooProvider,
};
use scout_core::domain::{Horizon, Symbol};
use scout_core::strategy::{Evaluator, SmaAdvisor, StrategyKind};

use crate::config::{ConfigError, ScoutConfig};
use crate::session::{CredentialStore, ScanParams, Session};
use crate::table::{assemble, ScoutTable, TableOptions};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("provider setup failed: {0}")]
    Provider(#[from] DataError),
}

/// Result of one scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub table: ScoutTable,
    pub params: ScanParams,
    /// Symbols in the resolved universe before any filtering.
    pub universe_size: usize,
    /// Symbols with no usable price data, and why.
    pub missing: Vec<MissingSymbol>,
    pub scanned_at: DateTime<Local>,
}

pub struct Scout {
    config: ScoutConfig,
    resolver: UniverseResolver,
    history: PriceHistory,
    credentials: CredentialStore,
}

impl Scout {
    /// Assemble a scanner over explicit providers.
    pub fn new(
        config: ScoutConfig,
        prices: Box<dyn MarketDataProvider>,
        membership: Box<dyn MembershipProvider>,
    ) -> Self {
        let mut resolver = UniverseResolver::new(
            membership,
            Duration::from_secs(config.cache.universe_ttl_secs),
        )
        .with_suffix(&config.universe.exchange_suffix);
        for (index, tickers) in &config.universe.fallback {
            if !tickers.is_empty() {
                resolver = resolver.with_fallback(index, tickers.clone());
            }
        }

        let history = PriceHistory::new(prices, Duration::from_secs(config.cache.prices_ttl_secs));
        let credentials = CredentialStore::from_config(&config.auth);

        Self {
            config,
            resolver,
            history,
            credentials,
        }
    }

    /// Scanner backed by Yahoo prices and NSE membership lists.
    pub fn from_config(config: ScoutConfig) -> Result<Self, RunError> {
        config.validate()?;
        let breaker = Arc::new(CircuitBreaker::new(
            Duration::from_secs(config.provider.breaker_cooldown_secs),
            config.provider.breaker_failure_threshold,
        ));
        let prices = YahooProvider::new(config.provider.yahoo_settings(), breaker)?;
        let membership = NseMembershipProvider::new(
            config.universe.membership_urls.clone(),
            config.provider.timeout(),
            &config.provider.user_agent,
        )?;
        Ok(Self::new(config, Box::new(prices), Box::new(membership)))
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Start a session for `params` against the configured credentials.
    pub fn open_session(&self, params: ScanParams) -> Session {
        Session::open(&self.credentials, params)
    }

    pub fn resolve_universe(&self, id: &UniverseId) -> Vec<Symbol> {
        self.resolver.resolve(id)
    }

    /// Calendar-day lookback fetched for a strategy and horizon.
    pub fn lookback_days(&self, strategy: StrategyKind, horizon: Horizon) -> u32 {
        match strategy {
            StrategyKind::Mock => self.config.scan.quote_lookback_days,
            StrategyKind::Momentum => horizon.days(),
            StrategyKind::Sma => horizon.days().max(self.config.scan.sma_lookback_days),
        }
    }

    fn evaluator(&self, strategy: StrategyKind) -> Evaluator {
        let scan = &self.config.scan;
        let evaluator =
            Evaluator::new(strategy.build()).with_confidence(scan.confidence_range());
        if strategy.uses_sma() {
            evaluator.with_advisor(SmaAdvisor::new(scan.sma_window, scan.sma_tolerance))
        } else {
            evaluator
        }
    }

    /// Run one scan for the session's parameters.
    pub fn scan(&self, session: &Session) -> Result<ScanOutcome, RunError> {
        if !session.is_authenticated() {
            return Err(RunError::NotAuthenticated);
        }
        let params = &session.params;

        let symbols = self.resolver.resolve(&params.universe.id);
        let evaluator = self.evaluator(params.strategy);
        let days = self.lookback_days(params.strategy, params.horizon);
        let report = self.history.fetch(&symbols, HistoryWindow::LastDays(days));

        for m in &report.missing {
            tracing::debug!(symbol = %m.symbol, reason = %m.reason, "no price data");
        }

        let rows = symbols
            .iter()
            .filter_map(|s| {
                evaluator.evaluate(s, params.horizon, params.investment, report.get(s))
            })
            .collect();

        let options = TableOptions {
            penny_filter: params.universe.penny_filter_active(),
            penny_threshold: self.config.scan.penny_threshold,
        };
        let table = assemble(rows, &options);

        tracing::info!(
            universe = %params.universe.id,
            horizon = %params.horizon,
            strategy = evaluator.strategy_name(),
            resolved = symbols.len(),
            priced = report.series.len(),
            rows = table.len(),
            "scan complete"
        );
        if let Some(warning) = table.empty_warning() {
            tracing::warn!("{warning}");
        }

        Ok(ScanOutcome {
            table,
            params: params.clone(),
            universe_size: symbols.len(),
            missing: report.missing,
            scanned_at: Local::now(),
        })
    }
}
