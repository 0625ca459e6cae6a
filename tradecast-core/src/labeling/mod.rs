//! Training labels from forward returns.
//!
//! A row at position t (within the retained feature rows) is labelled from
//! close[t + h] / close[t] - 1, where h = |label_horizon|. Rows whose forward
//! return cannot be computed (the last h rows, non-finite ratios) are
//! excluded from the dataset rather than labelled NO_TRADE.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Label;
use crate::features::{FeatureRow, FeatureSchema, FeatureTable};
use crate::variant::VariantConfig;

/// Threshold labeler over a fixed horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Labeler {
    horizon: usize,
    threshold: f64,
}

impl Labeler {
    /// `horizon` uses the shift convention (negative = forward); only its
    /// magnitude matters. `threshold` is a fraction (0.002 = 0.2%).
    pub fn new(horizon: i32, threshold: f64) -> Self {
        Self {
            horizon: horizon.unsigned_abs() as usize,
            threshold: threshold.abs(),
        }
    }

    pub fn from_variant(config: &VariantConfig) -> Self {
        Self::new(config.label_horizon, config.label_threshold)
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Strict comparison on both sides; exactly ±threshold is NO_TRADE.
    pub fn label_for(&self, forward_return: f64) -> Label {
        if forward_return > self.threshold {
            Label::Up
        } else if forward_return < -self.threshold {
            Label::Down
        } else {
            Label::NoTrade
        }
    }

    /// close[t + h] / close[t] - 1, or `None` past the end or when not finite.
    pub fn forward_return(&self, closes: &[f64], t: usize) -> Option<f64> {
        let future = *closes.get(t + self.horizon)?;
        let current = *closes.get(t)?;
        let ratio = future / current - 1.0;
        ratio.is_finite().then_some(ratio)
    }

    /// Forward return for every position (`None` where unavailable).
    pub fn forward_returns(&self, closes: &[f64]) -> Vec<Option<f64>> {
        (0..closes.len())
            .map(|t| self.forward_return(closes, t))
            .collect()
    }

    /// Label every row of `table` that has a forward return.
    pub fn label_table(&self, table: &FeatureTable) -> LabeledDataset {
        let closes = table.closes();
        let mut samples = Vec::with_capacity(table.len());
        let mut excluded = 0;

        for (row, forward) in table.rows().iter().zip(self.forward_returns(&closes)) {
            match forward {
                Some(forward_return) => samples.push(LabeledSample {
                    row: row.clone(),
                    forward_return,
                    label: self.label_for(forward_return),
                }),
                None => excluded += 1,
            }
        }

        debug!(
            rows = table.len(),
            labelled = samples.len(),
            excluded,
            horizon = self.horizon,
            "labelled feature table"
        );

        LabeledDataset {
            schema: table.schema().clone(),
            samples,
            excluded,
        }
    }
}

/// A feature row with its training target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub row: FeatureRow,
    pub forward_return: f64,
    pub label: Label,
}

/// Labelled rows in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    pub schema: FeatureSchema,
    pub samples: Vec<LabeledSample>,
    /// Rows dropped because no forward return was available.
    pub excluded: usize,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn stats(&self) -> LabelStats {
        LabelStats::from_labels(self.samples.iter().map(|s| s.label))
    }
}

/// Class balance of a labelled dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    pub total: usize,
    pub counts: BTreeMap<Label, usize>,
}

impl LabelStats {
    pub fn from_labels(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut counts: BTreeMap<Label, usize> = Label::ALL.iter().map(|&l| (l, 0)).collect();
        let mut total = 0;
        for label in labels {
            *counts.entry(label).or_insert(0) += 1;
            total += 1;
        }
        Self { total, counts }
    }

    pub fn count(&self, label: Label) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Share of `label` in percent (0 for an empty dataset).
    pub fn percent(&self, label: Label) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total as f64 * 100.0
    }
}
