//! Fetch → canonicalize → `OhlcvSeries`, with failures mapped to pipeline errors.

use tracing::info;

use super::canonicalize::to_series;
use super::provider::{DataProvider, Interval};
use super::retry::{fetch_with_retry, RetryPolicy};
use crate::domain::OhlcvSeries;
use crate::error::PipelineError;

/// Load a validated series for `symbol`, or `DataUnavailable`.
pub fn fetch_series(
    provider: &dyn DataProvider,
    policy: &RetryPolicy,
    symbol: &str,
    interval: Interval,
    period: &str,
) -> Result<OhlcvSeries, PipelineError> {
    let unavailable = |reason: String| PipelineError::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
    };

    let fetched = fetch_with_retry(provider, policy, symbol, interval, period)
        .map_err(|e| unavailable(e.to_string()))?;
    let raw = fetched.bars.len();
    let series = to_series(symbol, fetched.bars).map_err(|e| unavailable(e.to_string()))?;

    info!(
        symbol,
        provider = provider.name(),
        source = ?fetched.source,
        %interval,
        period,
        raw,
        bars = series.len(),
        "loaded series"
    );
    Ok(series)
}
