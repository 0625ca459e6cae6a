//! Reading and writing classifier artifacts (JSON).

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::{ModelError, SoftmaxClassifier};
use crate::error::PipelineError;

/// Load and validate a classifier artifact.
///
/// A missing file is `MissingModelArtifact`, which tells the caller to
/// train the model first.
pub fn load_classifier(path: &Path) -> Result<SoftmaxClassifier, PipelineError> {
    if !path.exists() {
        warn!(path = %path.display(), "model artifact not found");
        return Err(PipelineError::MissingModelArtifact {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model: SoftmaxClassifier = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    model.validate()?;

    info!(
        path = %path.display(),
        name = %model.name,
        features = model.schema.len(),
        "loaded classifier"
    );
    Ok(model)
}

/// Write `model` as pretty JSON, creating parent directories.
pub fn save_classifier(path: &Path, model: &SoftmaxClassifier) -> Result<(), ModelError> {
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(model).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)
}
