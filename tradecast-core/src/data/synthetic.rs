//! Deterministic synthetic bars for offline runs and tests.
//!
//! A bounded random walk from 100.0, seeded by BLAKE3 of the symbol and
//! interval. Intraday intervals produce regular-session bars (14:30 to 21:00
//! UTC); weekends are skipped. Bars end at a fixed anchor, so the same
//! anchor always produces the same data.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{period_days, DataError, DataProvider, DataSource, FetchResult, Interval};
use crate::domain::Bar;

const SESSION_OPEN: (u32, u32) = (14, 30);
const SESSION_MINUTES: i64 = 390;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    anchor: DateTime<Utc>,
}

impl SyntheticProvider {
    /// Bars up to and including `anchor`.
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    /// Anchored at the end of today's session, so repeated runs on the
    /// same day see the same bars.
    pub fn today() -> Self {
        let today = Utc::now().date_naive();
        let close = NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(Utc.from_utc_datetime(&today.and_time(close)))
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    /// Bar timestamps inside the trailing `days` calendar days.
    fn timestamps(&self, interval: Interval, days: i64) -> Vec<DateTime<Utc>> {
        let end = self.anchor;
        let mut out = Vec::new();
        let mut date = (end - Duration::days(days)).date_naive();

        while date <= end.date_naive() {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let (h, m) = SESSION_OPEN;
                let open = NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
                let session_start = Utc.from_utc_datetime(&date.and_time(open));

                if interval.is_intraday() {
                    let mut offset = 0;
                    while offset < SESSION_MINUTES {
                        out.push(session_start + Duration::minutes(offset));
                        offset += interval.minutes();
                    }
                } else if interval == Interval::Day1 || date.weekday() == Weekday::Mon {
                    out.push(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
                }
            }
            date = date.succ_opt().unwrap_or(date + Duration::days(1));
        }

        out.retain(|ts| *ts <= end);
        out
    }

    pub fn generate(&self, symbol: &str, interval: Interval, days: i64) -> Vec<Bar> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(interval.as_str().as_bytes());
        let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

        // Per-bar move scales with the square root of bar length.
        let max_move = 0.03 * (interval.minutes() as f64 / (24.0 * 60.0)).sqrt();
        let mut price = 100.0_f64;

        self.timestamps(interval, days)
            .into_iter()
            .map(|timestamp| {
                let change: f64 = rng.gen_range(-max_move..max_move);
                let open = price;
                let close = price * (1.0 + change);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..max_move / 3.0));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..max_move / 3.0));
                let volume = rng.gen_range(5_000..500_000u64) as f64;
                price = close;
                Bar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }
            })
            .collect()
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, interval: Interval, period: &str) -> Result<FetchResult, DataError> {
        let days = period_days(period)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.generate(symbol, interval, days),
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        // Friday after the close
        SyntheticProvider::new(Utc.with_ymd_and_hms(2024, 3, 8, 22, 0, 0).unwrap())
    }

    #[test]
    fn deterministic_per_symbol() {
        let p = provider();
        let a = p.generate("AAPL", Interval::Minute5, 5);
        assert_eq!(a, p.generate("AAPL", Interval::Minute5, 5));
        assert_ne!(a, p.generate("MSFT", Interval::Minute5, 5));
    }

    #[test]
    fn intraday_sessions_skip_weekends() {
        let bars = provider().generate("AAPL", Interval::Minute5, 5);
        // Mon 4th .. Fri 8th (Sun 3rd is the start day), 78 bars a session
        assert_eq!(bars.len(), 5 * 78);
        assert!(bars
            .iter()
            .all(|b| !matches!(b.timestamp.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(bars.iter().all(Bar::is_sane));
    }

    #[test]
    fn daily_bars_cover_a_year() {
        let result = provider().fetch("SPY", Interval::Day1, "1y").unwrap();
        assert!(result.bars.len() > 250 && result.bars.len() < 265);
        assert_eq!(result.source, DataSource::Synthetic);
    }

    #[test]
    fn bad_period_is_rejected() {
        assert!(provider().fetch("SPY", Interval::Day1, "forever").is_err());
    }
}
