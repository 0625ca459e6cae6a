//! Bollinger Bands: SMA(close, period) +/- multiplier * population stddev.
//!
//! Each band is a separate Indicator instance. Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(band: BollingerBand, period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let prefix = match band {
            BollingerBand::Upper => "bb_high",
            BollingerBand::Middle => "bb_mid",
            BollingerBand::Lower => "bb_low",
        };
        Self {
            period,
            multiplier,
            band,
            name: prefix.to_string(),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Upper, period, multiplier)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Lower, period, multiplier)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let p = self.period as f64;
        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|b| b.close).sum::<f64>() / p;
            let variance = window
                .iter()
                .map(|b| (b.close - mean).powi(2))
                .sum::<f64>()
                / p;
            let width = self.multiplier * variance.sqrt();

            result[i] = match self.band {
                BollingerBand::Upper => mean + width,
                BollingerBand::Middle => mean,
                BollingerBand::Lower => mean - width,
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_use_population_stddev() {
        // window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population stddev 2
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let upper = Bollinger::upper(8, 2.0).compute(&bars);
        let lower = Bollinger::lower(8, 2.0).compute(&bars);
        let middle = Bollinger::new(BollingerBand::Middle, 8, 2.0).compute(&bars);
        assert!(upper[6].is_nan());
        assert_approx(upper[7], 9.0, DEFAULT_EPSILON);
        assert_approx(lower[7], 1.0, DEFAULT_EPSILON);
        assert_approx(middle[7], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_series_collapses_bands() {
        let bars = make_bars(&[10.0; 5]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[4], 10.0, DEFAULT_EPSILON);
        assert_approx(lower[4], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn names() {
        assert_eq!(Bollinger::upper(20, 2.0).name(), "bb_high");
        assert_eq!(Bollinger::lower(20, 2.0).name(), "bb_low");
    }
}
