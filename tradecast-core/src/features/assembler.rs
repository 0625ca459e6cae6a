//! Feature assembler: bar series in, complete clipped feature rows out.

use tracing::debug;

use super::frame::{compute_warmup, standard_indicators, IndicatorFrame};
use super::schema::FeatureSchema;
use super::table::{FeatureRow, FeatureTable};
use crate::domain::OhlcvSeries;
use crate::indicators::Indicator;

/// Builds `FeatureTable`s for a fixed schema.
///
/// Rows are dropped when any schema feature is missing or infinite.
/// Intermediate columns outside the schema never cause a drop. Clipping to
/// [-1, 1] is applied after dropping.
pub struct FeatureAssembler {
    schema: FeatureSchema,
    indicators: Vec<Box<dyn Indicator>>,
    clipped: Vec<bool>,
}

impl FeatureAssembler {
    pub fn new(schema: FeatureSchema) -> Self {
        let clipped = schema
            .names()
            .iter()
            .map(|n| FeatureSchema::is_clipped(n))
            .collect();
        Self {
            schema,
            indicators: standard_indicators(),
            clipped,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Bars consumed before the first possible complete row.
    pub fn warmup_bars(&self) -> usize {
        compute_warmup(&self.indicators)
    }

    pub fn assemble(&self, series: &OhlcvSeries) -> FeatureTable {
        let bars = series.bars();
        let frame = IndicatorFrame::compute(bars, &self.indicators);

        let columns: Vec<&[f64]> = self
            .schema
            .names()
            .iter()
            .map(|name| frame.get_series(name).unwrap_or(&[]))
            .collect();

        let mut rows = Vec::with_capacity(bars.len().saturating_sub(self.warmup_bars()));
        for (i, bar) in bars.iter().enumerate() {
            let mut values = Vec::with_capacity(columns.len());
            for (col, &clip) in columns.iter().zip(&self.clipped) {
                match col.get(i) {
                    Some(&v) if v.is_finite() => {
                        values.push(if clip { v.clamp(-1.0, 1.0) } else { v });
                    }
                    _ => break,
                }
            }
            if values.len() == columns.len() {
                rows.push(FeatureRow {
                    timestamp: bar.timestamp,
                    close: bar.close,
                    values,
                });
            }
        }

        debug!(
            symbol = series.symbol(),
            bars = bars.len(),
            rows = rows.len(),
            dropped = bars.len() - rows.len(),
            "assembled feature table"
        );

        FeatureTable::new(self.schema.clone(), rows, bars.len())
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(FeatureSchema::canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OhlcvSeries;
    use crate::indicators::make_bars;

    fn series(closes: &[f64]) -> OhlcvSeries {
        OhlcvSeries::new("TEST", make_bars(closes)).unwrap()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.37).sin() * 4.0 + i as f64 * 0.05).collect()
    }

    #[test]
    fn short_series_yields_no_rows() {
        let table = FeatureAssembler::default().assemble(&series(&wavy(49)));
        assert!(table.is_empty());
        assert!(matches!(
            table.require_latest(49),
            Err(crate::error::PipelineError::InsufficientHistory { bars: 49, .. })
        ));
    }

    #[test]
    fn first_row_after_warmup() {
        let assembler = FeatureAssembler::default();
        let table = assembler.assemble(&series(&wavy(60)));
        assert_eq!(table.len(), 60 - assembler.warmup_bars());
        let first = &table.rows()[0];
        assert_eq!(first.timestamp, make_bars(&wavy(60))[49].timestamp);
        assert_eq!(first.values.len(), 23);
    }

    #[test]
    fn clipped_features_within_bounds() {
        // Large jumps produce returns far outside [-1, 1]
        let closes: Vec<f64> = (0..80)
            .map(|i| if i % 2 == 0 { 100.0 } else { 400.0 })
            .collect();
        let table = FeatureAssembler::default().assemble(&series(&closes));
        assert!(!table.is_empty());
        let ret = table.column("return").unwrap();
        assert!(ret.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(ret.iter().any(|&v| v == 1.0));
        // rsi is not clipped
        assert!(table.column("rsi").unwrap().iter().any(|&v| v > 1.0));
    }

    #[test]
    fn zero_volume_rows_are_dropped_not_zeroed() {
        let mut bars = make_bars(&wavy(70));
        bars[60].volume = 0.0;
        let series = OhlcvSeries::new("TEST", bars.clone()).unwrap();
        let table = FeatureAssembler::default().assemble(&series);
        // volume_change at 61 is inf, then lagged at 62..=64
        for ts in [61, 62, 63, 64].map(|i| bars[i].timestamp) {
            assert!(table.rows().iter().all(|r| r.timestamp != ts));
        }
        assert!(table.rows().iter().all(|r| r.values.iter().all(|v| v.is_finite())));
        assert!(table.rows().iter().any(|r| r.timestamp == bars[65].timestamp));
    }

    #[test]
    fn assembly_is_deterministic() {
        let s = series(&wavy(120));
        let a = FeatureAssembler::default().assemble(&s);
        let b = FeatureAssembler::default().assemble(&s);
        assert_eq!(a, b);
    }
}
