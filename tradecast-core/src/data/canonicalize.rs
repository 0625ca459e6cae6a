//! Raw provider bars → a valid `OhlcvSeries`.

use tracing::{debug, warn};

use crate::domain::{Bar, OhlcvSeries, SeriesError};

/// Sort by timestamp, keep the first of duplicate timestamps, drop void bars.
///
/// The sort is stable, so "first" means first in provider order.
pub fn canonicalize(mut bars: Vec<Bar>) -> Vec<Bar> {
    let raw = bars.len();
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    let deduped = bars.len();
    bars.retain(|b| !b.is_void());

    if bars.len() != raw {
        debug!(
            raw,
            duplicates = raw - deduped,
            void = deduped - bars.len(),
            "canonicalized bars"
        );
    }
    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        warn!(insane, "bars failed the OHLC sanity check and were kept");
    }

    bars
}

/// Canonicalize and wrap as a series.
pub fn to_series(symbol: &str, bars: Vec<Bar>) -> Result<OhlcvSeries, SeriesError> {
    OhlcvSeries::new(symbol, canonicalize(bars))
}
