//! Market data: provider contract, Yahoo and synthetic providers,
//! canonicalization, retry and circuit breaking.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod fetch;
pub mod provider;
pub mod retry;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonicalize, to_series};
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use fetch::fetch_series;
pub use provider::{period_days, DataError, DataProvider, DataSource, FetchResult, Interval};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
