//! Price-history acquisition: providers, circuit breaker, and the fetch chain.

pub mod chain;
pub mod circuit_breaker;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod test_server;

pub use chain::{FetchAttempt, FetchChain, ResolvedSeries, DEFAULT_CRYPTO_SUFFIX};
pub use circuit_breaker::CircuitBreaker;
pub use memory::InMemoryProvider;
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::{HttpSettings, YahooChartProvider, YahooClient, YahooHistoryProvider};
