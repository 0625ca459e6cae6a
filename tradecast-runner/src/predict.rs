//! Single-symbol prediction: artifact → data → features → decision.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tradecast_core::data::DataProvider;
use tradecast_core::decision::DecisionEngine;
use tradecast_core::domain::{DecisionRecord, OhlcvSeries};
use tradecast_core::features::FeatureAssembler;
use tradecast_core::model::{load_classifier, Classifier};
use tradecast_core::variant::{ModelVariant, VariantConfig};
use tradecast_core::PipelineError;

use crate::config::RunnerConfig;
use crate::data_loader::{load_series, Lookback};
use crate::error::RunError;

pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Upper-cased, trimmed symbol; blank or absent input means `DEFAULT_SYMBOL`.
pub fn normalize_symbol(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => DEFAULT_SYMBOL.to_string(),
    }
}

/// The JSON body returned to callers: a decision record or `{"error": msg}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Record(DecisionRecord),
    Error { error: String },
}

impl PredictionResponse {
    pub fn from_result(result: Result<DecisionRecord, RunError>) -> Self {
        match result {
            Ok(record) => PredictionResponse::Record(record),
            Err(e) => PredictionResponse::Error {
                error: e.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PredictionResponse::Error { .. })
    }
}

/// Assemble features for `series`, score the latest row and decide.
///
/// The classifier's declared schema is checked before it is invoked. Prices
/// in the record come from the scored row, which may precede the last bar
/// when trailing rows were dropped.
pub fn predict_from_series(
    assembler: &FeatureAssembler,
    engine: &DecisionEngine,
    classifier: &dyn Classifier,
    series: &OhlcvSeries,
    variant: &VariantConfig,
) -> Result<DecisionRecord, PipelineError> {
    assembler.schema().ensure_matches(classifier.schema())?;

    let table = assembler.assemble(series);
    let row = table.require_latest(assembler.warmup_bars())?;
    let probs = classifier.predict_probabilities(&row.values)?;

    Ok(engine.decide(&probs, variant, series.symbol(), row.close))
}

/// Prediction service state shared across requests.
pub struct Predictor {
    config: RunnerConfig,
    provider: Arc<dyn DataProvider>,
    assembler: FeatureAssembler,
    engine: DecisionEngine,
}

impl Predictor {
    pub fn new(config: RunnerConfig, provider: Arc<dyn DataProvider>) -> Self {
        let engine = DecisionEngine::new(config.confidence_threshold);
        Self {
            config,
            provider,
            assembler: FeatureAssembler::default(),
            engine,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn DataProvider {
        self.provider.as_ref()
    }

    /// Load the variant's classifier from the models directory.
    pub fn load_classifier(&self, variant: ModelVariant) -> Result<Arc<dyn Classifier>, RunError> {
        let model = load_classifier(&self.config.artifact_path(variant))?;
        Ok(Arc::new(model))
    }

    /// Predict with an already-loaded classifier.
    pub fn predict_with(
        &self,
        classifier: &dyn Classifier,
        symbol: &str,
        variant: ModelVariant,
    ) -> Result<DecisionRecord, RunError> {
        let variant_config = self.config.variant_config(variant);
        let series = load_series(
            self.provider.as_ref(),
            &self.config,
            &variant_config,
            symbol,
            Lookback::Inference,
        )?;
        let record = predict_from_series(
            &self.assembler,
            &self.engine,
            classifier,
            &series,
            &variant_config,
        )?;
        info!(
            symbol,
            variant = %variant,
            decision = %record.decision,
            up = record.up_prob,
            down = record.down_prob,
            "prediction"
        );
        Ok(record)
    }

    /// Load the artifact (before touching the network), then predict.
    pub fn predict(&self, symbol: &str, variant: ModelVariant) -> Result<DecisionRecord, RunError> {
        let classifier = self.load_classifier(variant)?;
        self.predict_with(classifier.as_ref(), symbol, variant)
    }

    /// Request-shaped entry point: optional raw symbol and variant name in,
    /// JSON-ready response out. Never fails; errors become `{"error": ...}`.
    pub fn get_prediction(&self, symbol: Option<&str>, variant: Option<&str>) -> PredictionResponse {
        let symbol = normalize_symbol(symbol);
        let variant = variant.map(ModelVariant::parse).unwrap_or_default();
        let result = self.predict(&symbol, variant);
        if let Err(e) = &result {
            warn!(symbol = %symbol, variant = %variant, error = %e, "prediction failed");
        }
        PredictionResponse::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Duration, TimeZone, Utc};
    use tradecast_core::decision::round2;
    use tradecast_core::domain::{Bar, Label, SignalClass};
    use tradecast_core::features::FeatureSchema;
    use tradecast_core::model::{ClassProbabilities, ModelError};

    /// Constant probabilities; counts how often it is asked.
    struct CountingClassifier {
        schema: FeatureSchema,
        calls: AtomicUsize,
    }

    impl CountingClassifier {
        fn new(schema: FeatureSchema) -> Self {
            Self {
                schema,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        fn schema(&self) -> &FeatureSchema {
            &self.schema
        }

        fn classes(&self) -> Vec<Label> {
            vec![Label::Down, Label::NoTrade, Label::Up]
        }

        fn predict_probabilities(&self, _row: &[f64]) -> Result<ClassProbabilities, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ClassProbabilities::from_pairs(&self.classes(), &[0.1, 0.2, 0.7])
        }
    }

    fn wavy_bars(n: usize) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.37).sin() * 2.0;
                Bar {
                    timestamp: base + Duration::minutes(5 * i as i64),
                    open: close,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    #[test]
    fn record_is_priced_off_the_scored_row() {
        let mut bars = wavy_bars(80);
        // volume_change of the last bar becomes infinite, so its row is dropped
        bars[78].volume = 0.0;
        bars[79].close = 150.0;
        bars[79].high = 150.5;
        let series = OhlcvSeries::new("AAPL", bars).unwrap();

        let assembler = FeatureAssembler::default();
        let scored = assembler.assemble(&series).latest_row().unwrap().clone();
        assert_eq!(scored.timestamp, series.bars()[78].timestamp);

        let classifier = CountingClassifier::new(FeatureSchema::canonical());
        let variant = VariantConfig::intraday();
        let record = predict_from_series(
            &assembler,
            &DecisionEngine::default(),
            &classifier,
            &series,
            &variant,
        )
        .unwrap();

        assert_eq!(record.signal_class, SignalClass::Buy);
        assert_eq!(record.last_price, round2(scored.close));
        assert!(record.last_price < 150.0);
        assert!(record.target_price < 150.0);
    }

    #[test]
    fn schema_mismatch_aborts_before_the_classifier_runs() {
        let series = OhlcvSeries::new("AAPL", wavy_bars(80)).unwrap();
        let classifier = CountingClassifier::new(FeatureSchema::from_names(1, ["return", "rsi"]));

        let err = predict_from_series(
            &FeatureAssembler::default(),
            &DecisionEngine::default(),
            &classifier,
            &series,
            &VariantConfig::intraday(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn symbol_normalization() {
        assert_eq!(normalize_symbol(Some("reliance.ns")), "RELIANCE.NS");
        assert_eq!(normalize_symbol(Some("  msft ")), "MSFT");
        assert_eq!(normalize_symbol(Some("")), "AAPL");
        assert_eq!(normalize_symbol(None), "AAPL");
    }

    #[test]
    fn error_response_shape() {
        let resp = PredictionResponse::Error {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_value(&resp).unwrap(), serde_json::json!({"error": "boom"}));
        assert!(resp.is_error());
    }

    #[test]
    fn record_response_is_flat() {
        let record = DecisionRecord {
            symbol: "AAPL".into(),
            up_prob: 65.0,
            down_prob: 20.0,
            no_trade_prob: 15.0,
            decision: "BUY (INTRADAY)".into(),
            signal_class: SignalClass::Buy,
            last_price: 100.0,
            target_price: 100.2,
            risk_price: 99.8,
            expected_move: 0.2,
            time_hint: "15 mins".into(),
            currency: "$".into(),
        };
        let value = serde_json::to_value(PredictionResponse::Record(record)).unwrap();
        assert_eq!(value["decision"], "BUY (INTRADAY)");
        assert_eq!(value["signal_class"], "buy");
        assert!(value.get("error").is_none());
    }
}
