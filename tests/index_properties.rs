//! Property tests for the measurement index

use proptest::prelude::*;
use rift_core::{DuplexEncoder, IndexConfig, Measurement, Polarity, RiftIndex};

#[derive(Clone, Debug)]
enum Op {
    Insert(u32, u8, bool),
    Measure(u32, f32, Option<bool>),
    PruneNegative,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..512, any::<u8>(), any::<bool>()).prop_map(|(k, v, a)| Op::Insert(k, v, a)),
        2 => (0u32..512, 0.0f32..1.0, proptest::option::of(any::<bool>()))
            .prop_map(|(k, c, p)| Op::Measure(k, c, p)),
        1 => Just(Op::PruneNegative),
    ]
}

proptest! {
    #[test]
    fn prop_invariants_survive_mixed_operations(ops in proptest::collection::vec(op(), 0..400)) {
        let mut index = RiftIndex::new();
        let mut keys = std::collections::BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key, value, is_a) => {
                    index.insert(key, value, 1.0, Polarity::from_is_a(is_a));
                    keys.insert(key);
                }
                Op::Measure(key, confidence, polarity) => {
                    let polarity = polarity.map(Polarity::from_is_a);
                    let outcome = index.mark_measurement(key, confidence, polarity);
                    prop_assert_eq!(outcome == Measurement::Missing, !keys.contains(&key));
                    if let Some(entry) = index.find(key) {
                        let qualifies = confidence < 0.5 || entry.polarity == Polarity::Negative;
                        // Default policy prunes on the first qualifying reading
                        prop_assert_eq!(matches!(outcome, Measurement::Pruned { .. }), qualifies);
                        if qualifies {
                            prop_assert_eq!(entry.value, 0);
                            prop_assert_eq!(entry.confidence, 0.0);
                        }
                    }
                }
                Op::PruneNegative => {
                    index.prune_negative();
                    prop_assert!(index
                        .iter()
                        .filter(|e| e.polarity == Polarity::Negative)
                        .all(|e| e.is_pruned()));
                }
            }
        }

        prop_assert!(index.validate().is_ok());
        prop_assert_eq!(index.len(), keys.len());
        let in_order: Vec<u32> = index.iter().map(|e| e.key).collect();
        prop_assert_eq!(in_order, keys.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_reset_clears_streak(streak in 2u32..6, lows in 1u32..5) {
        let config = IndexConfig { prune_threshold: 0.5, prune_streak: streak };
        let mut index = RiftIndex::with_config(config).unwrap();
        index.insert(7, 0x33, 1.0, Polarity::Positive);

        let lows = lows.min(streak - 1);
        for _ in 0..lows {
            index.mark_measurement(7, 0.1, None);
        }
        prop_assert_eq!(index.streak(7), lows);
        let outcome = index.mark_measurement(7, 0.9, Some(Polarity::Positive));
        prop_assert_eq!(outcome, Measurement::Reset);
        prop_assert_eq!(index.streak(7), 0);
        prop_assert!(!index.find(7).unwrap().is_pruned());
    }

    #[test]
    fn prop_output_length_is_half_rounded_up(
        input in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        let mut index = RiftIndex::new();
        let out = DuplexEncoder::new().encode(&mut index, &input, Polarity::Positive);
        prop_assert_eq!(out.len(), input.len().div_ceil(2));
        prop_assert!(index.validate().is_ok());
    }
}
