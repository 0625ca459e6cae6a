//! Training dataset: build, chronological split, CSV export.
//!
//! Training itself happens outside this workspace. The exported CSV has one
//! row per labelled sample (timestamp, the schema's features in order,
//! forward_return, label) and a JSON sidecar describing how it was built.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use tradecast_core::data::{DataProvider, Interval};
use tradecast_core::features::FeatureAssembler;
use tradecast_core::domain::Label;
use tradecast_core::labeling::{LabelStats, LabeledDataset, LabeledSample, Labeler};
use tradecast_core::variant::{ModelVariant, VariantConfig};

use crate::config::RunnerConfig;
use crate::data_loader::{load_series, Lookback};
use crate::error::RunError;

/// Share of rows held out for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Labelled rows for one symbol and variant.
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    pub symbol: String,
    pub variant: VariantConfig,
    pub data: LabeledDataset,
}

/// Fetch the training lookback, assemble features and label them.
pub fn build_training_dataset(
    provider: &dyn DataProvider,
    config: &RunnerConfig,
    symbol: &str,
    variant: ModelVariant,
) -> Result<TrainingDataset, RunError> {
    let variant_config = config.variant_config(variant);
    let series = load_series(provider, config, &variant_config, symbol, Lookback::Training)?;

    let table = FeatureAssembler::default().assemble(&series);
    let data = Labeler::from_variant(&variant_config).label_table(&table);
    if data.is_empty() {
        return Err(RunError::EmptyDataset {
            symbol: symbol.to_string(),
            reason: format!(
                "{} bars gave {} feature rows, none with a forward return",
                series.len(),
                table.len()
            ),
        });
    }

    let stats = data.stats();
    info!(
        symbol,
        variant = %variant,
        bars = series.len(),
        rows = data.len(),
        excluded = data.excluded,
        up = stats.count(Label::Up),
        down = stats.count(Label::Down),
        no_trade = stats.count(Label::NoTrade),
        "built training dataset"
    );

    Ok(TrainingDataset {
        symbol: symbol.to_string(),
        variant: variant_config,
        data,
    })
}

/// Split without shuffling: the earliest rows train, the latest rows test.
///
/// The test part gets `ceil(len * test_fraction)` rows.
pub fn chronological_split(dataset: &LabeledDataset, test_fraction: f64) -> (LabeledDataset, LabeledDataset) {
    let n = dataset.len();
    let fraction = test_fraction.clamp(0.0, 1.0);
    let n_test = ((n as f64) * fraction).ceil() as usize;
    let cut = n - n_test.min(n);

    let part = |samples: &[LabeledSample]| LabeledDataset {
        schema: dataset.schema.clone(),
        samples: samples.to_vec(),
        excluded: 0,
    };
    (part(&dataset.samples[..cut]), part(&dataset.samples[cut..]))
}

/// Sidecar metadata written next to an exported CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub symbol: String,
    pub variant: ModelVariant,
    pub interval: Interval,
    pub training_period: String,
    pub label_horizon: i32,
    pub label_threshold: f64,
    pub schema_version: u32,
    pub schema_fingerprint: String,
    pub feature_names: Vec<String>,
    pub rows: usize,
    pub excluded: usize,
    pub label_stats: LabelStats,
}

impl DatasetMetadata {
    pub fn describe(dataset: &TrainingDataset) -> Self {
        let schema = &dataset.data.schema;
        Self {
            symbol: dataset.symbol.clone(),
            variant: dataset.variant.variant,
            interval: dataset.variant.interval,
            training_period: dataset.variant.training_period.clone(),
            label_horizon: dataset.variant.label_horizon,
            label_threshold: dataset.variant.label_threshold,
            schema_version: schema.version(),
            schema_fingerprint: schema.fingerprint(),
            feature_names: schema.names().to_vec(),
            rows: dataset.data.len(),
            excluded: dataset.data.excluded,
            label_stats: dataset.data.stats(),
        }
    }
}

/// `data.csv` → `data.meta.json`.
pub fn sidecar_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("meta.json")
}

/// Write the CSV and its sidecar. Returns the metadata written.
pub fn export_csv(dataset: &TrainingDataset, path: &Path) -> Result<DatasetMetadata, RunError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["timestamp".to_string()];
    header.extend(dataset.data.schema.names().iter().cloned());
    header.push("forward_return".into());
    header.push("label".into());
    writer.write_record(&header)?;

    for sample in &dataset.data.samples {
        let mut record = Vec::with_capacity(header.len());
        record.push(sample.row.timestamp.to_rfc3339());
        record.extend(sample.row.values.iter().map(|v| v.to_string()));
        record.push(sample.forward_return.to_string());
        record.push(sample.label.value().to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    let metadata = DatasetMetadata::describe(dataset);
    fs::write(sidecar_path(path), serde_json::to_string_pretty(&metadata)?)?;

    info!(path = %path.display(), rows = metadata.rows, "exported training dataset");
    Ok(metadata)
}
