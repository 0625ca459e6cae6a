//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, the
//! synthetic generator) so the pipeline can be run offline and mocked in tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Bar interval as understood by the chart API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1wk")]
    Week1,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::Minute1,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Day1,
        Interval::Week1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
        }
    }

    /// Bar length in minutes.
    pub fn minutes(self) -> i64 {
        match self {
            Interval::Minute1 => 1,
            Interval::Minute5 => 5,
            Interval::Minute15 => 15,
            Interval::Minute30 => 30,
            Interval::Hour1 => 60,
            Interval::Day1 => 24 * 60,
            Interval::Week1 => 7 * 24 * 60,
        }
    }

    pub fn is_intraday(self) -> bool {
        self.minutes() < 24 * 60
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| DataError::InvalidRequest(format!("unknown interval '{s}'")))
    }
}

/// Parse a lookback period such as "5d", "60d", "1y", "3mo" into calendar days.
pub fn period_days(period: &str) -> Result<i64, DataError> {
    let split = period
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| DataError::InvalidRequest(format!("period '{period}' has no unit")))?;
    let (count, unit) = period.split_at(split);
    let count: i64 = count
        .parse()
        .map_err(|_| DataError::InvalidRequest(format!("period '{period}' has no count")))?;
    let per_unit = match unit {
        "d" => 1,
        "wk" => 7,
        "mo" => 30,
        "y" => 365,
        _ => {
            return Err(DataError::InvalidRequest(format!(
                "period '{period}' has unknown unit '{unit}'"
            )))
        }
    };
    Ok(count * per_unit)
}

/// Structured error types for data operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("provider returned no bars for {symbol}")]
    EmptyResult { symbol: String },

    #[error("no data for {symbol} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        symbol: String,
        attempts: u32,
        last_error: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DataError::NetworkUnreachable(_)
                | DataError::RateLimited { .. }
                | DataError::ResponseFormatChanged(_)
                | DataError::EmptyResult { .. }
                | DataError::Other(_)
        )
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Trait for data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch OHLCV bars for `symbol` at `interval`, covering the trailing `period`.
    ///
    /// A single attempt; retrying is the caller's concern (`fetch_series`).
    fn fetch(&self, symbol: &str, interval: Interval, period: &str) -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
