//! Assembled feature rows aligned with a `FeatureSchema`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::FeatureSchema;
use crate::error::PipelineError;

/// One complete feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    /// Close of the bar the row was computed at.
    pub close: f64,
    /// Values in schema order.
    pub values: Vec<f64>,
}

/// Ordered, complete feature rows for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    rows: Vec<FeatureRow>,
    source_bars: usize,
}

impl FeatureTable {
    pub(crate) fn new(schema: FeatureSchema, rows: Vec<FeatureRow>, source_bars: usize) -> Self {
        Self {
            schema,
            rows,
            source_bars,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of input bars the table was assembled from.
    pub fn source_bars(&self) -> usize {
        self.source_bars
    }

    /// The most recent complete row (inference input).
    pub fn latest_row(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// Like `latest_row`, but an empty table is an `InsufficientHistory` error.
    pub fn require_latest(&self, required: usize) -> Result<&FeatureRow, PipelineError> {
        self.latest_row().ok_or(PipelineError::InsufficientHistory {
            bars: self.source_bars,
            required,
        })
    }

    /// All values of one feature, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Closes of the retained rows, in order.
    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }
}
