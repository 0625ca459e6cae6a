//! TradeCast Core: OHLCV domain types, indicator engine, feature assembly,
//! labeling, the decision engine and the market-data contract.
//!
//! Data flow:
//! - `data`: provider → canonicalized `OhlcvSeries`
//! - `indicators` + `features`: series → `FeatureTable` aligned with the
//!   canonical `FeatureSchema`
//! - `labeling`: feature table → labelled training rows
//! - `model` + `decision`: latest row → class probabilities → `DecisionRecord`
//!
//! Everything here is synchronous and free of global state.

pub mod data;
pub mod decision;
pub mod domain;
pub mod error;
pub mod features;
pub mod indicators;
pub mod labeling;
pub mod model;
pub mod variant;

pub use error::PipelineError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::OhlcvSeries>();
        require_sync::<domain::OhlcvSeries>();
        require_send::<domain::DecisionRecord>();
        require_sync::<domain::DecisionRecord>();

        require_send::<features::FeatureSchema>();
        require_sync::<features::FeatureSchema>();
        require_send::<features::FeatureTable>();
        require_sync::<features::FeatureTable>();
        require_send::<features::FeatureAssembler>();
        require_sync::<features::FeatureAssembler>();

        require_send::<labeling::Labeler>();
        require_sync::<labeling::Labeler>();
        require_send::<labeling::LabeledDataset>();
        require_sync::<labeling::LabeledDataset>();

        require_send::<decision::DecisionEngine>();
        require_sync::<decision::DecisionEngine>();
        require_send::<model::ClassProbabilities>();
        require_sync::<model::ClassProbabilities>();
        require_send::<model::SoftmaxClassifier>();
        require_sync::<model::SoftmaxClassifier>();

        require_send::<variant::VariantConfig>();
        require_sync::<variant::VariantConfig>();

        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();

        require_send::<PipelineError>();
        require_sync::<PipelineError>();
    }

    /// The classifier seam is object-safe and shareable across threads.
    #[test]
    fn classifier_is_object_safe() {
        fn _check(classifier: &dyn model::Classifier, row: &[f64]) {
            let _ = classifier.predict_probabilities(row);
        }
        fn _shared(_: std::sync::Arc<dyn model::Classifier>) {}
    }
}
