//! Runner configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! models_dir = "models"
//! confidence_threshold = 0.6
//! offline_synthetic = false
//!
//! [retry]
//! max_attempts = 3
//! backoff_ms = 2000
//!
//! [variants.daily]
//! expected_move_pct = 1.5
//! label_threshold = 0.015
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradecast_core::data::RetryPolicy;
use tradecast_core::decision::CONFIDENCE_THRESHOLD;
use tradecast_core::variant::{ModelVariant, VariantConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory holding `model_intraday.json` / `model_daily.json`.
    pub models_dir: PathBuf,
    pub confidence_threshold: f64,
    /// Use the synthetic provider instead of Yahoo Finance.
    pub offline_synthetic: bool,
    pub retry: RetryConfig,
    pub variants: VariantOverrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intraday: Option<VariantOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<VariantOverride>,
}

/// Tunable per-variant parameters. Everything else is fixed per variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_move_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_threshold: Option<f64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            confidence_threshold: CONFIDENCE_THRESHOLD,
            offline_synthetic: false,
            retry: RetryConfig::default(),
            variants: VariantOverrides::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
        }
    }
}

impl RunnerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold must be in (0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        for (name, o) in [("intraday", &self.variants.intraday), ("daily", &self.variants.daily)] {
            let Some(o) = o else { continue };
            if o.expected_move_pct.is_some_and(|m| !(m.is_finite() && m >= 0.0)) {
                return Err(ConfigError::Invalid(format!(
                    "variants.{name}.expected_move_pct must be a non-negative number"
                )));
            }
            if o.label_threshold.is_some_and(|t| !(t.is_finite() && t >= 0.0)) {
                return Err(ConfigError::Invalid(format!(
                    "variants.{name}.label_threshold must be a non-negative number"
                )));
            }
        }
        Ok(())
    }

    /// The variant's fixed parameters with any configured overrides applied.
    pub fn variant_config(&self, variant: ModelVariant) -> VariantConfig {
        let base = variant.config();
        let overrides = match variant {
            ModelVariant::Intraday => self.variants.intraday.as_ref(),
            ModelVariant::Daily => self.variants.daily.as_ref(),
        };
        let Some(o) = overrides else { return base };

        let mut config = base;
        if let Some(m) = o.expected_move_pct {
            config = config.with_expected_move_pct(m);
        }
        if let Some(t) = o.label_threshold {
            config = config.with_label_threshold(t);
        }
        config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.backoff_ms),
        )
    }

    pub fn artifact_path(&self, variant: ModelVariant) -> PathBuf {
        self.models_dir.join(variant.config().artifact_name)
    }

    /// Deterministic content hash of this configuration (BLAKE3 over JSON).
    pub fn config_id(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = RunnerConfig::from_toml("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(config.confidence_threshold, 0.6);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn overrides_apply_to_one_variant() {
        let config = RunnerConfig::from_toml(
            r#"
            models_dir = "/srv/models"

            [variants.daily]
            expected_move_pct = 2.0
            "#,
        )
        .unwrap();

        let daily = config.variant_config(ModelVariant::Daily);
        assert_eq!(daily.expected_move_pct, 2.0);
        assert_eq!(daily.label_threshold, 0.015);
        assert_eq!(config.variant_config(ModelVariant::Intraday), VariantConfig::intraday());
        assert_eq!(
            config.artifact_path(ModelVariant::Daily),
            PathBuf::from("/srv/models/model_daily.json")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            RunnerConfig::from_toml("confidence_threshold = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunnerConfig::from_toml("[retry]\nmax_attempts = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunnerConfig::from_toml("[variants.intraday]\nlabel_threshold = -0.1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunnerConfig::from_toml("models_dir = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip_and_config_id() {
        let mut config = RunnerConfig::default();
        config.offline_synthetic = true;
        config.variants.intraday = Some(VariantOverride {
            expected_move_pct: Some(0.3),
            label_threshold: None,
        });
        let text = config.to_toml().unwrap();
        let back = RunnerConfig::from_toml(&text).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.config_id(), config.config_id());
        assert_ne!(config.config_id(), RunnerConfig::default().config_id());
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradecast.toml");
        std::fs::write(&path, "offline_synthetic = true\n[retry]\nbackoff_ms = 0\n").unwrap();
        let config = RunnerConfig::from_file(&path).unwrap();
        assert!(config.offline_synthetic);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_ms, 0);

        assert!(matches!(
            RunnerConfig::from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
