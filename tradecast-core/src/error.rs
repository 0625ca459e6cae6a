//! Pipeline-level errors surfaced to callers of the core.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::SeriesError;
use crate::model::ModelError;

/// Failure of a pipeline stage that aborts the whole request.
///
/// Per-row indicator problems are never errors; they show up as missing
/// values and are dropped by the feature assembler.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("insufficient history: {bars} bars yield no complete feature row (need more than {required})")]
    InsufficientHistory { bars: usize, required: usize },

    #[error("feature schema mismatch: expected [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("model artifact not found at {}: train the model first", .path.display())]
    MissingModelArtifact { path: PathBuf },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}
