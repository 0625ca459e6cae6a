//! Confidence rule, risk bands and the decision record.

use crate::domain::{Decision, DecisionRecord};
use crate::model::ClassProbabilities;
use crate::variant::VariantConfig;

/// Minimum class probability required to act.
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Turns class probabilities into a `DecisionRecord`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionEngine {
    threshold: f64,
}

impl DecisionEngine {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// UP is checked before DOWN; both use `>=`.
    pub fn classify(&self, probs: &ClassProbabilities) -> Decision {
        if probs.up() >= self.threshold {
            Decision::Buy
        } else if probs.down() >= self.threshold {
            Decision::Sell
        } else {
            Decision::NoTrade
        }
    }

    pub fn decide(
        &self,
        probs: &ClassProbabilities,
        config: &VariantConfig,
        symbol: &str,
        last_price: f64,
    ) -> DecisionRecord {
        let decision = self.classify(probs);
        let (target, risk) = risk_levels(last_price, config.expected_move_pct);

        DecisionRecord {
            symbol: symbol.to_string(),
            up_prob: round2(probs.up() * 100.0),
            down_prob: round2(probs.down() * 100.0),
            no_trade_prob: round2(probs.no_trade() * 100.0),
            decision: decision.describe(config.variant),
            signal_class: decision.signal_class(),
            last_price: round2(last_price),
            target_price: round2(target),
            risk_price: round2(risk),
            expected_move: config.expected_move_pct,
            time_hint: config.time_hint.clone(),
            currency: currency_for_symbol(symbol).to_string(),
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(CONFIDENCE_THRESHOLD)
    }
}

/// Illustrative (target, risk) prices: last ± expected move percent.
/// Applied on every branch, NO TRADE included.
pub fn risk_levels(last_price: f64, expected_move_pct: f64) -> (f64, f64) {
    let m = expected_move_pct / 100.0;
    (last_price * (1.0 + m), last_price * (1.0 - m))
}

/// "₹" for NSE/BSE listings, "$" otherwise.
pub fn currency_for_symbol(symbol: &str) -> &'static str {
    if symbol.ends_with(".NS") || symbol.ends_with(".BO") {
        "₹"
    } else {
        "$"
    }
}

/// Round half away from zero to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
