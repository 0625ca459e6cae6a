//! Ichimoku lines computed without the forward display shift.
//!
//! - Conversion (tenkan): (highest high + lowest low) / 2 over `conversion` bars
//! - Base (kijun): same over `base` bars
//! - Span A: (conversion + base) / 2, at the same bar (no 26-bar projection)
//!
//! Keeping span A unshifted keeps the line causal.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IchimokuLine {
    Conversion,
    Base,
    SpanA,
}

#[derive(Debug, Clone)]
pub struct Ichimoku {
    conversion: usize,
    base: usize,
    line: IchimokuLine,
    name: String,
}

impl Ichimoku {
    pub fn new(line: IchimokuLine, conversion: usize, base: usize) -> Self {
        assert!(conversion >= 1 && base >= 1, "Ichimoku periods must be >= 1");
        let name = match line {
            IchimokuLine::Conversion => "ichimoku_conversion",
            IchimokuLine::Base => "ichimoku_base",
            IchimokuLine::SpanA => "ichimoku_a",
        };
        Self {
            conversion,
            base,
            line,
            name: name.to_string(),
        }
    }
}

impl Indicator for Ichimoku {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            IchimokuLine::Conversion => self.conversion - 1,
            IchimokuLine::Base => self.base - 1,
            IchimokuLine::SpanA => self.conversion.max(self.base) - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        match self.line {
            IchimokuLine::Conversion => midpoint(bars, self.conversion),
            IchimokuLine::Base => midpoint(bars, self.base),
            IchimokuLine::SpanA => midpoint(bars, self.conversion)
                .iter()
                .zip(midpoint(bars, self.base))
                .map(|(c, b)| (c + b) / 2.0)
                .collect(),
        }
    }
}

/// (highest high + lowest low) / 2 over a trailing window.
fn midpoint(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &bars[i + 1 - period..=i];
        if window.iter().any(|b| b.high.is_nan() || b.low.is_nan()) {
            continue;
        }
        let hh = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let ll = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        result[i] = (hh + ll) / 2.0;
    }

    result
}
