//! Classifier capability and the bundled linear implementation.
//!
//! The decision pipeline only needs `predict_probabilities` and `classes`;
//! any model that declares the schema it was trained on can be plugged in.

pub mod artifact;
pub mod linear;

pub use artifact::{load_classifier, save_classifier};
pub use linear::SoftmaxClassifier;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Label;
use crate::features::FeatureSchema;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("classifier expects {expected} features, got {actual}")]
    InputWidth { expected: usize, actual: usize },

    #[error("{classes} classes but {probabilities} probabilities")]
    ClassCountMismatch { classes: usize, probabilities: usize },

    #[error("class {0} listed more than once")]
    DuplicateClass(Label),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Probability per class label, keyed by label value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassProbabilities {
    probs: BTreeMap<Label, f64>,
}

impl ClassProbabilities {
    /// Pair a classifier's class order with its probability output.
    pub fn from_pairs(classes: &[Label], probabilities: &[f64]) -> Result<Self, ModelError> {
        if classes.len() != probabilities.len() {
            return Err(ModelError::ClassCountMismatch {
                classes: classes.len(),
                probabilities: probabilities.len(),
            });
        }
        let mut probs = BTreeMap::new();
        for (&label, &p) in classes.iter().zip(probabilities) {
            if probs.insert(label, p).is_some() {
                return Err(ModelError::DuplicateClass(label));
            }
        }
        Ok(Self { probs })
    }

    /// Probability of `label`; 0 when the classifier has no such class.
    pub fn get(&self, label: Label) -> f64 {
        self.probs.get(&label).copied().unwrap_or(0.0)
    }

    pub fn up(&self) -> f64 {
        self.get(Label::Up)
    }

    pub fn down(&self) -> f64 {
        self.get(Label::Down)
    }

    pub fn no_trade(&self) -> f64 {
        self.get(Label::NoTrade)
    }

    /// Most probable class. Ties go to the lowest label value.
    pub fn argmax(&self) -> Option<Label> {
        let mut best: Option<(Label, f64)> = None;
        for (&label, &p) in &self.probs {
            match best {
                Some((_, bp)) if p <= bp => {}
                _ => best = Some((label, p)),
            }
        }
        best.map(|(label, _)| label)
    }
}

/// A trained three-way classifier.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Feature names and order the model was trained on.
    fn schema(&self) -> &FeatureSchema;

    /// Class labels the model can emit, in output order.
    fn classes(&self) -> Vec<Label>;

    /// Probabilities for one feature row (values in `schema()` order).
    fn predict_probabilities(&self, row: &[f64]) -> Result<ClassProbabilities, ModelError>;
}
