//! Held-out accuracy of a classifier on labelled rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use tradecast_core::data::DataProvider;
use tradecast_core::domain::Label;
use tradecast_core::labeling::LabeledDataset;
use tradecast_core::model::Classifier;
use tradecast_core::variant::ModelVariant;
use tradecast_core::PipelineError;

use crate::config::RunnerConfig;
use crate::dataset::{build_training_dataset, chronological_split};
use crate::error::RunError;

/// Per-class hit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassScore {
    /// Rows whose true label is this class.
    pub support: usize,
    /// Of those, rows predicted correctly.
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub classifier: String,
    pub samples: usize,
    pub correct: usize,
    /// correct / samples; 0 for an empty dataset.
    pub accuracy: f64,
    pub per_class: BTreeMap<Label, ClassScore>,
}

/// Score `classifier` on every row of `dataset` (argmax vs label).
pub fn evaluate(classifier: &dyn Classifier, dataset: &LabeledDataset) -> Result<EvaluationReport, PipelineError> {
    dataset.schema.ensure_matches(classifier.schema())?;

    let mut per_class: BTreeMap<Label, ClassScore> = BTreeMap::new();
    let mut correct = 0;
    for sample in &dataset.samples {
        let probs = classifier.predict_probabilities(&sample.row.values)?;
        let hit = probs.argmax() == Some(sample.label);
        let score = per_class.entry(sample.label).or_default();
        score.support += 1;
        if hit {
            score.correct += 1;
            correct += 1;
        }
    }

    let samples = dataset.len();
    let accuracy = if samples == 0 {
        0.0
    } else {
        correct as f64 / samples as f64
    };

    Ok(EvaluationReport {
        classifier: classifier.name().to_string(),
        samples,
        correct,
        accuracy,
        per_class,
    })
}

/// Build the training dataset, hold out the latest `test_fraction` and score it.
pub fn evaluate_holdout(
    provider: &dyn DataProvider,
    config: &RunnerConfig,
    classifier: &dyn Classifier,
    symbol: &str,
    variant: ModelVariant,
    test_fraction: f64,
) -> Result<EvaluationReport, RunError> {
    let dataset = build_training_dataset(provider, config, symbol, variant)?;
    let (_, test) = chronological_split(&dataset.data, test_fraction);
    if test.is_empty() {
        return Err(RunError::EmptyDataset {
            symbol: symbol.to_string(),
            reason: format!("test fraction {test_fraction} leaves no held-out rows"),
        });
    }

    let report = evaluate(classifier, &test)?;
    info!(
        symbol,
        variant = %variant,
        train_rows = dataset.data.len() - test.len(),
        samples = report.samples,
        accuracy = report.accuracy,
        "held-out evaluation"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tradecast_core::features::{FeatureRow, FeatureSchema};
    use tradecast_core::labeling::LabeledSample;
    use tradecast_core::model::{ClassProbabilities, ModelError};

    /// Predicts Up when the first feature is positive, Down otherwise.
    struct SignOfFirst(FeatureSchema);

    impl Classifier for SignOfFirst {
        fn name(&self) -> &str {
            "sign"
        }
        fn schema(&self) -> &FeatureSchema {
            &self.0
        }
        fn classes(&self) -> Vec<Label> {
            vec![Label::Down, Label::Up]
        }
        fn predict_probabilities(&self, row: &[f64]) -> Result<ClassProbabilities, ModelError> {
            let up = if row[0] > 0.0 { 0.9 } else { 0.1 };
            ClassProbabilities::from_pairs(&self.classes(), &[1.0 - up, up])
        }
    }

    fn dataset(rows: &[(f64, Label)]) -> LabeledDataset {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        LabeledDataset {
            schema: FeatureSchema::from_names(1, ["x"]),
            samples: rows
                .iter()
                .enumerate()
                .map(|(i, &(x, label))| LabeledSample {
                    row: FeatureRow {
                        timestamp: base + chrono::Duration::days(i as i64),
                        close: 100.0,
                        values: vec![x],
                    },
                    forward_return: 0.0,
                    label,
                })
                .collect(),
            excluded: 0,
        }
    }

    #[test]
    fn accuracy_counts_argmax_hits() {
        let data = dataset(&[
            (1.0, Label::Up),
            (-1.0, Label::Down),
            (2.0, Label::Down),
            (0.5, Label::NoTrade),
        ]);
        let report = evaluate(&SignOfFirst(FeatureSchema::from_names(1, ["x"])), &data).unwrap();
        assert_eq!(report.samples, 4);
        assert_eq!(report.correct, 2);
        assert!((report.accuracy - 0.5).abs() < 1e-12);
        assert_eq!(report.per_class[&Label::Down], ClassScore { support: 2, correct: 1 });
        assert_eq!(report.per_class[&Label::NoTrade], ClassScore { support: 1, correct: 0 });
    }

    #[test]
    fn empty_dataset_scores_zero() {
        let report = evaluate(&SignOfFirst(FeatureSchema::from_names(1, ["x"])), &dataset(&[])).unwrap();
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn schema_mismatch_is_reported() {
        let err = evaluate(&SignOfFirst(FeatureSchema::from_names(1, ["y"])), &dataset(&[(1.0, Label::Up)])).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }
}
