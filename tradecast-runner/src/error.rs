use thiserror::Error;
use tradecast_core::data::DataError;
use tradecast_core::PipelineError;

use crate::config::ConfigError;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("data provider error: {0}")]
    Data(#[from] DataError),

    #[error("no labelled rows for {symbol}: {reason}")]
    EmptyDataset { symbol: String, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
