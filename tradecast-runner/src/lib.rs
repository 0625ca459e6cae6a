//! TradeCast Runner: orchestration on top of `tradecast-core`.
//!
//! - TOML configuration (`RunnerConfig`)
//! - Provider selection (Yahoo Finance or synthetic) and series loading
//! - Single-symbol prediction producing the JSON response body
//! - Parallel batch prediction
//! - Training dataset build, chronological split and CSV export
//! - Held-out evaluation of a classifier

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod predict;

pub use batch::predict_batch;
pub use config::{ConfigError, RetryConfig, RunnerConfig, VariantOverride, VariantOverrides};
pub use data_loader::{build_provider, load_series, Lookback};
pub use dataset::{
    build_training_dataset, chronological_split, export_csv, DatasetMetadata, TrainingDataset,
    DEFAULT_TEST_FRACTION,
};
pub use error::RunError;
pub use evaluate::{evaluate, evaluate_holdout, ClassScore, EvaluationReport};
pub use predict::{normalize_symbol, predict_from_series, PredictionResponse, Predictor, DEFAULT_SYMBOL};
