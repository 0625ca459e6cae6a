//! Parallel prediction over many symbols.

use rayon::prelude::*;
use tracing::info;
use tradecast_core::variant::ModelVariant;

use crate::predict::{normalize_symbol, PredictionResponse, Predictor};

/// Predict every symbol with one shared classifier.
///
/// Responses come back in input order. A missing artifact fails every
/// symbol with the same error rather than aborting the batch.
pub fn predict_batch(predictor: &Predictor, symbols: &[String], variant: ModelVariant) -> Vec<PredictionResponse> {
    let classifier = match predictor.load_classifier(variant) {
        Ok(c) => c,
        Err(e) => {
            let error = e.to_string();
            return symbols
                .iter()
                .map(|_| PredictionResponse::Error { error: error.clone() })
                .collect();
        }
    };

    let responses: Vec<PredictionResponse> = symbols
        .par_iter()
        .map(|raw| {
            let symbol = normalize_symbol(Some(raw));
            PredictionResponse::from_result(predictor.predict_with(classifier.as_ref(), &symbol, variant))
        })
        .collect();

    let failed = responses.iter().filter(|r| r.is_error()).count();
    info!(
        symbols = symbols.len(),
        failed,
        variant = %variant,
        "batch prediction complete"
    );
    responses
}
