//! Bounded retry with a fixed backoff between attempts.

use std::time::Duration;

use tracing::warn;

use super::provider::{DataError, DataProvider, FetchResult, Interval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Single attempt, no sleeping. For tests and offline providers.
    pub fn immediate() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. The closure receives the 1-based attempt number.
    pub fn run<T>(
        &self,
        symbol: &str,
        mut op: impl FnMut(u32) -> Result<T, DataError>,
    ) -> Result<T, DataError> {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(symbol, attempt, max_attempts = attempts, error = %e, "fetch attempt failed");
                    last_error = Some(e);
                    if attempt < attempts && !self.backoff.is_zero() {
                        std::thread::sleep(self.backoff);
                    }
                }
            }
        }

        Err(DataError::RetriesExhausted {
            symbol: symbol.to_string(),
            attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// `provider.fetch` under `policy`, treating zero bars as a retryable failure.
pub fn fetch_with_retry(
    provider: &dyn DataProvider,
    policy: &RetryPolicy,
    symbol: &str,
    interval: Interval,
    period: &str,
) -> Result<FetchResult, DataError> {
    policy.run(symbol, |_| {
        let result = provider.fetch(symbol, interval, period)?;
        if result.bars.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: symbol.to_string(),
            });
        }
        Ok(result)
    })
}
