//! Named indicator columns for one bar series.
//!
//! Raw indicators are computed once, then derived columns (crossovers,
//! normalized distances, lags) are added on top. Every column has one value
//! per bar; NaN marks a value that could not be computed.

use std::collections::HashMap;

use crate::domain::Bar;
use crate::indicators::{
    normalized_distance, safe_ratio, Adx, Bollinger, Ema, Ichimoku, IchimokuLine, Indicator,
    MacdHistogram, PctChange, Rsi, Vwap,
};

use super::schema::LAG_DEPTH;

/// The raw indicators behind the canonical schema, in evaluation order.
pub fn standard_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(PctChange::close()),
        Box::new(PctChange::volume()),
        Box::new(Rsi::new(14)),
        Box::new(Ema::new(9)),
        Box::new(Ema::new(20)),
        Box::new(Ema::new(50)),
        Box::new(MacdHistogram::default()),
        Box::new(Adx::new(14)),
        Box::new(Ichimoku::new(IchimokuLine::SpanA, 9, 26)),
        Box::new(Ichimoku::new(IchimokuLine::Base, 9, 26)),
        Box::new(Bollinger::upper(20, 2.0)),
        Box::new(Bollinger::lower(20, 2.0)),
        Box::new(Vwap::new(14)),
    ]
}

/// Largest lookback across indicators.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}

/// Per-bar indicator container.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    len: usize,
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    /// Compute raw indicators and every derived column for `bars`.
    pub fn compute(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> Self {
        let mut frame = Self {
            len: bars.len(),
            series: HashMap::new(),
        };

        for indicator in indicators {
            let values = indicator.compute(bars);
            debug_assert_eq!(
                values.len(),
                bars.len(),
                "indicator '{}' produced {} values for {} bars",
                indicator.name(),
                values.len(),
                bars.len()
            );
            frame.insert(indicator.name(), values);
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        frame.add_derived(&closes);
        frame
    }

    fn add_derived(&mut self, closes: &[f64]) {
        let difference = |a: &[f64], b: &[f64]| -> Vec<f64> { a.iter().zip(b).map(|(x, y)| x - y).collect() };

        let cross_9_20 = difference(self.column("ema_9"), self.column("ema_20"));
        let cross_20_50 = difference(self.column("ema_20"), self.column("ema_50"));
        self.insert("ema_cross_9_20", cross_9_20);
        self.insert("ema_cross_20_50", cross_20_50);

        // (close - line) / line
        for (line, name) in [
            ("ema_9", "dist_ema_9"),
            ("ema_50", "dist_ema_50"),
            ("ichimoku_a", "dist_ichimoku_a"),
            ("ichimoku_base", "dist_ichimoku_base"),
        ] {
            let line = self.column(line).to_vec();
            self.insert(name, normalized_distance(closes, &line, &line));
        }

        // (band - close) / close, (close - band) / close, (vwap - close) / close
        let bb_high_diff = normalized_distance(self.column("bb_high"), closes, closes);
        let bb_low_diff = normalized_distance(closes, self.column("bb_low"), closes);
        let vwap_diff: Vec<f64> = self
            .column("vwap")
            .iter()
            .zip(closes)
            .map(|(&v, &c)| safe_ratio(v - c, c))
            .collect();
        self.insert("bb_high_diff", bb_high_diff);
        self.insert("bb_low_diff", bb_low_diff);
        self.insert("vwap_diff", vwap_diff);

        for k in 1..=LAG_DEPTH {
            let return_lag = lag(self.column("return"), k);
            let volume_lag = lag(self.column("volume_change"), k);
            self.insert(format!("return_lag_{k}"), return_lag);
            self.insert(format!("volume_lag_{k}"), volume_lag);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value of a named column at `bar_index`.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(bar_index).copied())
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// A column, or an all-missing slice if it was never computed.
    fn column(&self, name: &str) -> &[f64] {
        self.get_series(name).unwrap_or(&[])
    }

    /// Number of bars covered.
    pub fn bars(&self) -> usize {
        self.len
    }

    /// Number of columns stored.
    pub fn width(&self) -> usize {
        self.series.len()
    }
}

/// Shift a series `k` bars later: row t sees t - k.
pub fn lag(values: &[f64], k: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if k < n {
        out[k..].copy_from_slice(&values[..n - k]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_NAMES;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn lag_shifts_forward() {
        let out = lag(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(&out[2..], &[1.0, 2.0]);
        assert!(lag(&[1.0], 3)[0].is_nan());
    }

    #[test]
    fn frame_contains_every_schema_feature() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64 * 0.5).collect();
        let frame = IndicatorFrame::compute(&make_bars(&closes), &standard_indicators());
        for name in FEATURE_NAMES {
            let series = frame.get_series(name).unwrap_or_else(|| panic!("{name} missing"));
            assert_eq!(series.len(), 80);
        }
        assert_eq!(frame.bars(), 80);
    }

    #[test]
    fn derived_columns_follow_definitions() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0).collect();
        let bars = make_bars(&closes);
        let frame = IndicatorFrame::compute(&bars, &standard_indicators());
        let i = 55;
        let close = closes[i];

        let ema9 = frame.get("ema_9", i).unwrap();
        let ema20 = frame.get("ema_20", i).unwrap();
        assert_approx(frame.get("ema_cross_9_20", i).unwrap(), ema9 - ema20, DEFAULT_EPSILON);
        assert_approx(frame.get("dist_ema_9", i).unwrap(), (close - ema9) / ema9, DEFAULT_EPSILON);

        let upper = frame.get("bb_high", i).unwrap();
        assert_approx(frame.get("bb_high_diff", i).unwrap(), (upper - close) / close, DEFAULT_EPSILON);
        let lower = frame.get("bb_low", i).unwrap();
        assert_approx(frame.get("bb_low_diff", i).unwrap(), (close - lower) / close, DEFAULT_EPSILON);

        assert_eq!(frame.get("return_lag_2", i), frame.get("return", i - 2));
        assert_eq!(frame.get("volume_lag_3", i), frame.get("volume_change", i - 3));
    }

    #[test]
    fn standard_warmup_is_longest_ema() {
        assert_eq!(compute_warmup(&standard_indicators()), 49);
    }
}
