//! MACD histogram.
//!
//! macd = EMA(fast) - EMA(slow), signal = EMA(macd, signal_period),
//! histogram = macd - signal. EMAs follow `ema_of_series`, so the signal
//! line starts once the slow EMA is defined.
//! Lookback: slow - 1 + signal - 1.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct MacdHistogram {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl MacdHistogram {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow");
        Self {
            fast,
            slow,
            signal,
            name: "macd".to_string(),
        }
    }
}

impl Default for MacdHistogram {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Indicator for MacdHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        (self.slow - 1) + (self.signal - 1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&macd, self.signal);

        macd.iter().zip(&signal).map(|(m, s)| m - s).collect()
    }
}
