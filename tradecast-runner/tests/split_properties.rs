//! Property tests for the chronological train/test split.
//!
//! 1. Train and test together are the input, in the same order
//! 2. Every training row precedes every test row
//! 3. The test part holds ceil(n * fraction) rows

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use tradecast_core::domain::Label;
use tradecast_core::features::{FeatureRow, FeatureSchema};
use tradecast_core::labeling::{LabeledDataset, LabeledSample};
use tradecast_runner::chronological_split;

fn arb_dataset(max_len: usize) -> impl Strategy<Value = LabeledDataset> {
    prop::collection::vec((-1i8..=1, -0.05..0.05_f64), 0..max_len).prop_map(|draws| {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let samples = draws
            .into_iter()
            .enumerate()
            .map(|(i, (label, fwd))| LabeledSample {
                row: FeatureRow {
                    timestamp: base + Duration::days(i as i64),
                    close: 100.0 + i as f64,
                    values: vec![fwd],
                },
                forward_return: fwd,
                label: Label::try_from(label).unwrap_or(Label::NoTrade),
            })
            .collect();
        LabeledDataset {
            schema: FeatureSchema::from_names(1, ["x"]),
            samples,
            excluded: 0,
        }
    })
}

proptest! {
    #[test]
    fn split_partitions_in_order(dataset in arb_dataset(300), fraction in 0.0..=1.0_f64) {
        let (train, test) = chronological_split(&dataset, fraction);

        let joined: Vec<_> = train.samples.iter().chain(&test.samples).cloned().collect();
        prop_assert_eq!(&joined, &dataset.samples);
        prop_assert_eq!(&train.schema, &dataset.schema);
        prop_assert_eq!(&test.schema, &dataset.schema);

        if let (Some(last), Some(first)) = (train.samples.last(), test.samples.first()) {
            prop_assert!(last.row.timestamp < first.row.timestamp);
        }
    }

    #[test]
    fn test_part_rounds_up(dataset in arb_dataset(300), fraction in 0.0..=1.0_f64) {
        let n = dataset.len();
        let (_, test) = chronological_split(&dataset, fraction);
        prop_assert_eq!(test.len(), ((n as f64) * fraction).ceil() as usize);
    }
}
