//! Model variants and their immutable parameter sets.
//!
//! Every stage (data fetch, labeling, decision) receives a `VariantConfig`
//! explicitly; nothing reads these constants from anywhere else.

use crate::data::Interval;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    #[default]
    Intraday,
    Daily,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Intraday, ModelVariant::Daily];

    /// Parse a variant name. Anything other than "daily" selects intraday.
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("daily") {
            ModelVariant::Daily
        } else {
            ModelVariant::Intraday
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::Intraday => "intraday",
            ModelVariant::Daily => "daily",
        }
    }

    pub fn config(self) -> VariantConfig {
        match self {
            ModelVariant::Intraday => VariantConfig::intraday(),
            ModelVariant::Daily => VariantConfig::daily(),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-variant parameters.
///
/// `label_horizon` follows the shift convention: negative values look
/// forward, so -3 on 5-minute bars means "15 minutes ahead".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub variant: ModelVariant,
    pub interval: Interval,
    /// Lookback requested from the provider at inference time.
    pub period: String,
    /// Lookback requested from the provider when building training data.
    pub training_period: String,
    /// Percent move used for illustrative target/risk bands.
    pub expected_move_pct: f64,
    pub label_horizon: i32,
    /// Symmetric forward-return threshold, as a fraction (0.002 = 0.2%).
    pub label_threshold: f64,
    pub time_hint: String,
    /// File name of the serialized classifier inside the models directory.
    pub artifact_name: String,
}

impl VariantConfig {
    pub fn intraday() -> Self {
        Self {
            variant: ModelVariant::Intraday,
            interval: Interval::Minute5,
            period: "5d".into(),
            training_period: "60d".into(),
            expected_move_pct: 0.2,
            label_horizon: -3,
            label_threshold: 0.002,
            time_hint: "15 mins".into(),
            artifact_name: "model_intraday.json".into(),
        }
    }

    pub fn daily() -> Self {
        Self {
            variant: ModelVariant::Daily,
            interval: Interval::Day1,
            period: "1y".into(),
            training_period: "5y".into(),
            expected_move_pct: 1.5,
            label_horizon: -1,
            label_threshold: 0.015,
            time_hint: "next day".into(),
            artifact_name: "model_daily.json".into(),
        }
    }

    /// Copy of this config with a different expected move.
    pub fn with_expected_move_pct(mut self, pct: f64) -> Self {
        self.expected_move_pct = pct;
        self
    }

    /// Copy of this config with a different label threshold.
    pub fn with_label_threshold(mut self, threshold: f64) -> Self {
        self.label_threshold = threshold;
        self
    }

    /// Number of bars between a row and the close its label looks at.
    pub fn horizon_bars(&self) -> usize {
        self.label_horizon.unsigned_abs() as usize
    }
}
