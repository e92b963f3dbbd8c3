//! Scanner configuration loaded from TOML.
//!
//! Every section is optional; a missing file section falls back to the
//! built-in defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [provider]
//! timeout_secs = 15
//!
//! [scan]
//! penny_threshold = 50.0
//! confidence_min = 70
//!
//! [auth]
//! username = "analyst"
//! password_hash = "$argon2id$v=19$..."
//! ```

use crate::session::is_password_hash;
use scout_core::data::{YahooSettings, NIFTY100, NIFTY100_CSV_URL};
use scout_core::domain::DEFAULT_EXCHANGE_SUFFIX;
use scout_core::strategy::{ConfidenceRange, DEFAULT_SMA_WINDOW, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on `provider.max_retries`; backoff doubles per attempt.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub universe: UniverseConfig,
    pub scan: ScanConfig,
    pub auth: AuthConfig,
}

/// HTTP settings shared by the price and membership providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub user_agent: String,
    /// Breaker cooldown after a ban or repeated failures.
    pub breaker_cooldown_secs: u64,
    pub breaker_failure_threshold: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let yahoo = YahooSettings::default();
        Self {
            base_url: yahoo.base_url,
            timeout_secs: yahoo.timeout.as_secs(),
            max_retries: yahoo.max_retries,
            retry_base_delay_ms: 500,
            user_agent: yahoo.user_agent,
            breaker_cooldown_secs: 600,
            breaker_failure_threshold: 3,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn yahoo_settings(&self) -> YahooSettings {
        YahooSettings {
            base_url: self.base_url.clone(),
            timeout: self.timeout(),
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Price history TTL. Zero disables caching.
    pub prices_ttl_secs: u64,
    /// Index membership TTL. Zero disables caching.
    pub universe_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prices_ttl_secs: 300,
            universe_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub exchange_suffix: String,
    /// Index name → constituents CSV URL.
    pub membership_urls: BTreeMap<String, String>,
    /// Replaces the built-in fallback list for an index when non-empty.
    pub fallback: BTreeMap<String, Vec<String>>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        let mut membership_urls = BTreeMap::new();
        membership_urls.insert(NIFTY100.to_string(), NIFTY100_CSV_URL.to_string());
        Self {
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            membership_urls,
            fallback: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Penny stocks trade strictly below this price.
    pub penny_threshold: f64,
    pub confidence_min: u8,
    pub confidence_max: u8,
    pub sma_window: usize,
    /// Fractional band around the SMA and the investment amount.
    pub sma_tolerance: f64,
    /// Calendar days fetched when only the latest quote is needed.
    pub quote_lookback_days: u32,
    /// Minimum calendar days fetched for the SMA strategy.
    pub sma_lookback_days: u32,
    pub default_investment: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let confidence = ConfidenceRange::default();
        Self {
            penny_threshold: 50.0,
            confidence_min: confidence.min,
            confidence_max: confidence.max,
            sma_window: DEFAULT_SMA_WINDOW,
            sma_tolerance: DEFAULT_TOLERANCE,
            quote_lookback_days: 5,
            sma_lookback_days: 45,
            default_investment: 100_000.0,
        }
    }
}

impl ScanConfig {
    pub fn confidence_range(&self) -> ConfidenceRange {
        ConfidenceRange {
            min: self.confidence_min,
            max: self.confidence_max,
        }
    }
}

/// Single-user credentials. Both fields unset means anonymous access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: Option<String>,
    /// Argon2id PHC string, as printed by `scout hash-password`.
    pub password_hash: Option<String>,
}

impl ScoutConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scan = &self.scan;
        if !(scan.penny_threshold.is_finite() && scan.penny_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scan.penny_threshold must be positive, got {}",
                scan.penny_threshold
            )));
        }
        if scan.confidence_min > scan.confidence_max || scan.confidence_max > 100 {
            return Err(ConfigError::Invalid(format!(
                "scan.confidence range [{}, {}] must satisfy min <= max <= 100",
                scan.confidence_min, scan.confidence_max
            )));
        }
        if scan.sma_window == 0 {
            return Err(ConfigError::Invalid("scan.sma_window must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&scan.sma_tolerance) {
            return Err(ConfigError::Invalid(format!(
                "scan.sma_tolerance must be in [0, 1), got {}",
                scan.sma_tolerance
            )));
        }
        if scan.quote_lookback_days == 0 {
            return Err(ConfigError::Invalid(
                "scan.quote_lookback_days must be at least 1".into(),
            ));
        }
        if !(scan.default_investment.is_finite() && scan.default_investment > 0.0) {
            return Err(ConfigError::Invalid(
                "scan.default_investment must be positive".into(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be at least 1".into()));
        }
        if self.provider.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "provider.max_retries must be at most {MAX_RETRIES}, got {}",
                self.provider.max_retries
            )));
        }
        match (&self.auth.username, &self.auth.password_hash) {
            (Some(_), Some(hash)) if !is_password_hash(hash) => Err(ConfigError::Invalid(
                "auth.password_hash must be a PHC password hash string".into(),
            )),
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::Invalid(
                "auth.username and auth.password_hash must be set together".into(),
            )),
            _ => Ok(()),
        }
    }
}
