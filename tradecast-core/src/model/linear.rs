//! Multinomial logistic regression with optional standardization.

use serde::{Deserialize, Serialize};

use super::{ClassProbabilities, Classifier, ModelError};
use crate::domain::Label;
use crate::features::FeatureSchema;

/// Softmax over `weights · standardized(x) + intercepts`.
///
/// `weights[k]` holds the coefficients of `classes[k]`, one per schema
/// feature. When present, `feature_means`/`feature_scales` standardize the
/// input first; a zero scale leaves the centred value unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    pub name: String,
    pub schema: FeatureSchema,
    pub classes: Vec<Label>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_means: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_scales: Option<Vec<f64>>,
}

impl SoftmaxClassifier {
    /// Check that every dimension agrees with the schema and class list.
    pub fn validate(&self) -> Result<(), ModelError> {
        let width = self.schema.len();
        let invalid = |msg: String| Err(ModelError::InvalidArtifact(msg));

        if self.classes.is_empty() {
            return invalid("no classes".into());
        }
        for (i, label) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(label) {
                return Err(ModelError::DuplicateClass(*label));
            }
        }
        if self.weights.len() != self.classes.len() {
            return invalid(format!(
                "{} weight rows for {} classes",
                self.weights.len(),
                self.classes.len()
            ));
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != width) {
            return invalid(format!("weight row of length {} for {width} features", row.len()));
        }
        if self.intercepts.len() != self.classes.len() {
            return invalid(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                self.classes.len()
            ));
        }
        for (field, values) in [("feature_means", &self.feature_means), ("feature_scales", &self.feature_scales)] {
            if let Some(v) = values {
                if v.len() != width {
                    return invalid(format!("{field} has {} entries for {width} features", v.len()));
                }
            }
        }
        Ok(())
    }

    fn standardize(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(i, &x)| {
                let mean = self.feature_means.as_ref().map_or(0.0, |m| m[i]);
                let scale = self.feature_scales.as_ref().map_or(1.0, |s| s[i]);
                let centred = x - mean;
                if scale == 0.0 {
                    centred
                } else {
                    centred / scale
                }
            })
            .collect()
    }
}

impl Classifier for SoftmaxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn classes(&self) -> Vec<Label> {
        self.classes.clone()
    }

    fn predict_probabilities(&self, row: &[f64]) -> Result<ClassProbabilities, ModelError> {
        if row.len() != self.schema.len() {
            return Err(ModelError::InputWidth {
                expected: self.schema.len(),
                actual: row.len(),
            });
        }

        let x = self.standardize(row);
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(&x).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect();

        ClassProbabilities::from_pairs(&self.classes, &softmax(&logits))
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}
