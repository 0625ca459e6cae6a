//! Domain types for TradeCast

pub mod bar;
pub mod decision;
pub mod label;

pub use bar::{Bar, OhlcvSeries, SeriesError};
pub use decision::{Decision, DecisionRecord, SignalClass};
pub use label::{Label, UnknownLabel};
