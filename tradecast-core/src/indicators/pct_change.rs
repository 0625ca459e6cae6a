//! Bar-over-bar percent change of close ("return") or volume ("volume_change").
//!
//! change[t] = x[t] / x[t-1] - 1. The first bar has no predecessor and is NaN.
//! A zero predecessor yields ±inf (or NaN for 0/0); the feature assembler
//! turns infinities into missing values, so they are left as-is here.
//! Lookback: 1.

use super::Indicator;
use crate::domain::Bar;

/// Which bar field the change is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

#[derive(Debug, Clone)]
pub struct PctChange {
    field: PriceField,
    name: String,
}

impl PctChange {
    pub fn close() -> Self {
        Self {
            field: PriceField::Close,
            name: "return".to_string(),
        }
    }

    pub fn volume() -> Self {
        Self {
            field: PriceField::Volume,
            name: "volume_change".to_string(),
        }
    }

    fn value(&self, bar: &Bar) -> f64 {
        match self.field {
            PriceField::Close => bar.close,
            PriceField::Volume => bar.volume,
        }
    }
}

impl Indicator for PctChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut result = vec![f64::NAN; bars.len()];
        for i in 1..bars.len() {
            let prev = self.value(&bars[i - 1]);
            let curr = self.value(&bars[i]);
            result[i] = curr / prev - 1.0;
        }
        result
    }
}
