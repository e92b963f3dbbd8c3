//! Market data access: providers, shape normalization, caching, universes

pub mod cache;
pub mod circuit_breaker;
pub mod history;
pub mod membership;
pub mod provider;
pub mod shape;
pub mod universe;
pub mod yahoo;

pub use cache::{CacheKey, TtlCache};
pub use circuit_breaker::CircuitBreaker;
pub use history::{HistoryReport, HistoryWindow, MissingSymbol, PriceHistory};
pub use membership::{NseMembershipProvider, NIFTY100_CSV_URL};
pub use provider::{DataError, MarketDataProvider, MembershipProvider, ProviderFrame, RawClose};
pub use shape::normalize_frame;
pub use universe::{UniverseId, UniverseParseError, UniverseResolver, UniverseSpec, NIFTY100};
pub use yahoo::{YahooProvider, YahooSettings};
