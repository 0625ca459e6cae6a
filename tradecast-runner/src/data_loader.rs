//! Provider selection and series loading.
//!
//! Yahoo Finance is the live source; `offline_synthetic` swaps in the
//! deterministic synthetic provider. Synthetic data is logged loudly so it
//! is never mistaken for market data.

use std::sync::Arc;

use tracing::warn;
use tradecast_core::data::{
    fetch_series, CircuitBreaker, DataProvider, SyntheticProvider, YahooProvider,
};
use tradecast_core::domain::OhlcvSeries;
use tradecast_core::variant::VariantConfig;
use tradecast_core::PipelineError;

use crate::config::RunnerConfig;
use crate::error::RunError;

/// Which bars to request for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Recent history for inference.
    Inference,
    /// Longer history for building training data.
    Training,
}

pub fn build_provider(config: &RunnerConfig) -> Result<Arc<dyn DataProvider>, RunError> {
    if config.offline_synthetic {
        warn!("offline_synthetic is set: using synthetic bars, results are not market data");
        return Ok(Arc::new(SyntheticProvider::today()));
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Arc::new(YahooProvider::new(breaker)?))
}

/// Fetch the bars a variant needs for `symbol`, with the configured retry policy.
pub fn load_series(
    provider: &dyn DataProvider,
    config: &RunnerConfig,
    variant: &VariantConfig,
    symbol: &str,
    lookback: Lookback,
) -> Result<OhlcvSeries, PipelineError> {
    let period = match lookback {
        Lookback::Inference => &variant.period,
        Lookback::Training => &variant.training_period,
    };
    fetch_series(
        provider,
        &config.retry_policy(),
        symbol,
        variant.interval,
        period,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradecast_core::variant::ModelVariant;

    #[test]
    fn synthetic_provider_when_offline() {
        let config = RunnerConfig {
            offline_synthetic: true,
            ..RunnerConfig::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "synthetic");
    }

    #[test]
    fn training_lookback_is_longer() {
        let config = RunnerConfig::default();
        let provider = SyntheticProvider::new(
            chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2024, 3, 8, 22, 0, 0).unwrap(),
        );
        let variant = ModelVariant::Daily.config();
        let short = load_series(&provider, &config, &variant, "SPY", Lookback::Inference).unwrap();
        let long = load_series(&provider, &config, &variant, "SPY", Lookback::Training).unwrap();
        assert!(long.len() > 4 * short.len());
    }
}
