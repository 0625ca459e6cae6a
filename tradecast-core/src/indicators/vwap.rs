//! Rolling volume-weighted average price.
//!
//! typical = (high + low + close) / 3
//! vwap[t] = sum(typical * volume) / sum(volume) over the last `window` bars.
//! A window with zero total volume is missing. Lookback: window - 1.

use super::{safe_ratio, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Vwap {
    window: usize,
    name: String,
}

impl Vwap {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "VWAP window must be >= 1");
        Self {
            window,
            name: "vwap".to_string(),
        }
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window {
            return result;
        }

        for i in (self.window - 1)..n {
            let window = &bars[i + 1 - self.window..=i];
            let (pv, vol) = window.iter().fold((0.0, 0.0), |(pv, vol), b| {
                let typical = (b.high + b.low + b.close) / 3.0;
                (pv + typical * b.volume, vol + b.volume)
            });
            result[i] = safe_ratio(pv, vol);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn equal_volume_is_mean_typical_price() {
        let bars = make_bars(&[10.0, 12.0, 11.0]);
        let result = Vwap::new(2).compute(&bars);
        let typical = |b: &Bar| (b.high + b.low + b.close) / 3.0;
        assert!(result[0].is_nan());
        assert_approx(result[2], (typical(&bars[1]) + typical(&bars[2])) / 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volume_weights_the_average() {
        let mut bars = make_bars(&[10.0, 20.0]);
        bars[0].volume = 3000.0;
        bars[1].volume = 1000.0;
        let t0 = (bars[0].high + bars[0].low + bars[0].close) / 3.0;
        let t1 = (bars[1].high + bars[1].low + bars[1].close) / 3.0;
        let result = Vwap::new(2).compute(&bars);
        assert_approx(result[1], (3.0 * t0 + t1) / 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_window_is_missing() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        for b in &mut bars {
            b.volume = 0.0;
        }
        assert!(Vwap::new(2).compute(&bars).iter().all(|v| v.is_nan()));
    }
}
