//! Trade decision types and the per-request decision record.

use crate::variant::ModelVariant;
use serde::{Deserialize, Serialize};

/// Outcome of the confidence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Buy,
    Sell,
    NoTrade,
}

impl Decision {
    /// Display string, e.g. `"BUY (INTRADAY)"` or `"NO TRADE"`.
    pub fn describe(self, variant: ModelVariant) -> String {
        let tag = variant.as_str().to_uppercase();
        match self {
            Decision::Buy => format!("BUY ({tag})"),
            Decision::Sell => format!("SELL ({tag})"),
            Decision::NoTrade => "NO TRADE".to_string(),
        }
    }

    pub fn signal_class(self) -> SignalClass {
        match self {
            Decision::Buy => SignalClass::Buy,
            Decision::Sell => SignalClass::Sell,
            Decision::NoTrade => SignalClass::Neutral,
        }
    }
}

/// Presentation class consumed by front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    Buy,
    Sell,
    Neutral,
}

impl SignalClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalClass::Buy => "buy",
            SignalClass::Sell => "sell",
            SignalClass::Neutral => "neutral",
        }
    }
}

/// One inference result. Probabilities are percentages (0-100) and all
/// prices are rounded to two decimals. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub symbol: String,
    pub up_prob: f64,
    pub down_prob: f64,
    pub no_trade_prob: f64,
    pub decision: String,
    pub signal_class: SignalClass,
    pub last_price: f64,
    pub target_price: f64,
    pub risk_price: f64,
    pub expected_move: f64,
    pub time_hint: String,
    pub currency: String,
}
