//! The canonical feature schema shared by training and inference.
//!
//! Both model variants use the same ordered list of names. A classifier
//! records the schema it was trained on; the runner refuses to invoke it
//! when the two differ in names or order.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Current schema version. Bump when `FEATURE_NAMES` changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of lagged copies of `return` and `volume_change`.
pub const LAG_DEPTH: usize = 3;

/// Ordered feature names, exactly as fed to the classifier.
pub const FEATURE_NAMES: [&str; 23] = [
    "return",
    "volume_change",
    "rsi",
    "ema_9",
    "ema_20",
    "ema_50",
    "ema_cross_9_20",
    "ema_cross_20_50",
    "dist_ema_9",
    "dist_ema_50",
    "macd",
    "adx",
    "dist_ichimoku_a",
    "dist_ichimoku_base",
    "bb_high_diff",
    "bb_low_diff",
    "vwap_diff",
    "return_lag_1",
    "volume_lag_1",
    "return_lag_2",
    "volume_lag_2",
    "return_lag_3",
    "volume_lag_3",
];

/// Features clipped to [-1, 1] after incomplete rows are dropped.
pub const CLIPPED_FEATURES: [&str; 7] = [
    "return",
    "volume_change",
    "vwap_diff",
    "bb_high_diff",
    "bb_low_diff",
    "dist_ema_9",
    "dist_ema_50",
];

/// Ordered list of feature names plus a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u32,
    names: Vec<String>,
}

impl FeatureSchema {
    /// The schema produced by `FeatureAssembler`.
    pub fn canonical() -> Self {
        Self {
            version: SCHEMA_VERSION,
            names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Schema declared by an external party (e.g. a loaded model).
    pub fn from_names<I, S>(version: u32, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn is_clipped(name: &str) -> bool {
        CLIPPED_FEATURES.contains(&name)
    }

    /// BLAKE3 hex digest over the ordered names (newline-joined).
    pub fn fingerprint(&self) -> String {
        let joined = self.names.join("\n");
        blake3::hash(joined.as_bytes()).to_hex().to_string()
    }

    /// Fail with `SchemaMismatch` unless `other` has the same names in the same order.
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<(), PipelineError> {
        if self.names == other.names {
            return Ok(());
        }
        Err(PipelineError::SchemaMismatch {
            expected: self.names.join(", "),
            actual: other.names.join(", "),
        })
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_has_23_unique_names() {
        let schema = FeatureSchema::canonical();
        assert_eq!(schema.len(), 23);
        let mut sorted = schema.names().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 23);
    }

    #[test]
    fn clipped_features_are_in_schema() {
        let schema = FeatureSchema::canonical();
        for name in CLIPPED_FEATURES {
            assert!(schema.index_of(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let schema = FeatureSchema::canonical();
        let mut names = schema.names().to_vec();
        names.swap(0, 1);
        let swapped = FeatureSchema::from_names(SCHEMA_VERSION, names);
        assert_eq!(schema.fingerprint(), FeatureSchema::canonical().fingerprint());
        assert_ne!(schema.fingerprint(), swapped.fingerprint());
        assert_eq!(schema.fingerprint().len(), 64);
    }

    #[test]
    fn ensure_matches_rejects_reordering() {
        let schema = FeatureSchema::canonical();
        assert!(schema.ensure_matches(&FeatureSchema::canonical()).is_ok());

        let mut names = schema.names().to_vec();
        names.reverse();
        let err = schema
            .ensure_matches(&FeatureSchema::from_names(SCHEMA_VERSION, names))
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn ensure_matches_rejects_missing_name() {
        let schema = FeatureSchema::canonical();
        let short = FeatureSchema::from_names(SCHEMA_VERSION, FEATURE_NAMES[..22].iter().copied());
        assert!(schema.ensure_matches(&short).is_err());
    }
}
