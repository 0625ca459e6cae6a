//! Feature assembly: indicator columns → schema-aligned, complete rows.

pub mod assembler;
pub mod frame;
pub mod schema;
pub mod table;

pub use assembler::FeatureAssembler;
pub use frame::{lag, standard_indicators, IndicatorFrame};
pub use schema::{FeatureSchema, CLIPPED_FEATURES, FEATURE_NAMES, LAG_DEPTH, SCHEMA_VERSION};
pub use table::{FeatureRow, FeatureTable};
