//! Indicator engine.
//!
//! Indicators are pure functions: bar history in, numeric series out, one
//! value per bar. A value that cannot be computed (warm-up, zero denominator,
//! NaN input) is `f64::NAN`, which downstream stages treat as "missing".
//!
//! Multi-line indicators (Bollinger, Ichimoku) are exposed as separate named
//! instances per line, keeping the single-series `Indicator` trait unchanged.

pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod ichimoku;
pub mod macd;
pub mod pct_change;
pub mod rsi;
pub mod vwap;
pub mod wilder;

pub use adx::Adx;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use ichimoku::{Ichimoku, IchimokuLine};
pub use macd::MacdHistogram;
pub use pct_change::{PctChange, PriceField};
pub use rsi::Rsi;
pub use vwap::Vwap;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on bar t+1 or later. Every
/// indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Column name (e.g., "ema_9", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are always missing.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// `numerator / denominator`, or NaN when the denominator is zero or the
/// result is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return f64::NAN;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        f64::NAN
    }
}

/// Element-wise `(a - b) / divisor` over aligned series, with `safe_ratio` semantics.
pub fn normalized_distance(a: &[f64], b: &[f64], divisor: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .zip(divisor)
        .map(|((&x, &y), &d)| safe_ratio(x - y, d))
        .collect()
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high = max(open,close) + 1,
/// low = min(open,close) - 1, volume = 1000, five-minute spacing.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_ratio_maps_zero_denominator_to_missing() {
        assert!(safe_ratio(1.0, 0.0).is_nan());
        assert!(safe_ratio(0.0, 0.0).is_nan());
        assert!(safe_ratio(1.0, f64::NAN).is_nan());
        assert!(safe_ratio(f64::INFINITY, 2.0).is_nan());
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }

    #[test]
    fn normalized_distance_elementwise() {
        let out = normalized_distance(&[110.0, 90.0, 5.0], &[100.0, 100.0, 5.0], &[100.0, 100.0, 0.0]);
        assert_approx(out[0], 0.1, DEFAULT_EPSILON);
        assert_approx(out[1], -0.1, DEFAULT_EPSILON);
        assert!(out[2].is_nan());
    }
}
