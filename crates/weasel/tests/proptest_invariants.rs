//! Property tests for the window schedule, key encoding and bag merging.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use weasel::windows::{highest_bit, SHORT_SERIES_LENGTH};
use weasel::{encode_word, merge_bags, schedule_windows, window_of, WeaselError, WordBag};

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn bag_strategy() -> impl Strategy<Value = WordBag> {
    prop::collection::btree_map(0u64..64, 1u32..5, 0..6)
}

type WindowBags = Vec<Vec<WordBag>>;

/// `n_windows` lists of `n_instances` bags each, plus a shuffled copy.
fn windows_strategy() -> impl Strategy<Value = (usize, WindowBags, WindowBags)> {
    (1usize..5, 1usize..6)
        .prop_flat_map(|(n_instances, n_windows)| {
            (
                Just(n_instances),
                prop::collection::vec(
                    prop::collection::vec(bag_strategy(), n_instances),
                    n_windows,
                ),
            )
        })
        .prop_flat_map(|(n_instances, per_window)| {
            (
                Just(n_instances),
                Just(per_window.clone()),
                Just(per_window).prop_shuffle(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        ..ProptestConfig::default()
    })]

    #[test]
    fn schedule_is_an_arithmetic_sequence(
        series_length in 1usize..400,
        min_window in 1usize..30,
        cap_offset in 0usize..150,
        window_inc in 1usize..8,
    ) {
        let max_cap = min_window + cap_offset;
        match schedule_windows(series_length, min_window, max_cap, window_inc) {
            Ok(schedule) => {
                let effective_max = max_cap.min(series_length);
                prop_assert_eq!(schedule.max_window, effective_max);
                if series_length < SHORT_SERIES_LENGTH {
                    prop_assert_eq!(schedule.window_inc, 1);
                } else {
                    prop_assert_eq!(schedule.window_inc, window_inc);
                }

                let windows = &schedule.window_sizes;
                prop_assert_eq!(windows.first().copied(), Some(min_window));
                if min_window == effective_max {
                    prop_assert_eq!(windows, &vec![min_window]);
                } else {
                    prop_assert!(windows.iter().all(|&w| w < effective_max));
                    for pair in windows.windows(2) {
                        prop_assert_eq!(pair[1] - pair[0], schedule.window_inc);
                    }
                    let last = windows[windows.len() - 1];
                    prop_assert!(last + schedule.window_inc >= effective_max);
                }
                prop_assert!(windows.iter().all(|&w| w < 1usize << schedule.highest_bit));
            }
            Err(err) => {
                prop_assert!(matches!(err, WeaselError::Configuration(_)));
                prop_assert!(min_window > max_cap.min(series_length));
            }
        }
    }

    #[test]
    fn encoded_keys_never_collide_across_windows(
        word_a in 0u64..(1 << 25),
        word_b in 0u64..(1 << 25),
        max_window in 2usize..2048,
        window_a_seed in any::<usize>(),
        window_b_seed in any::<usize>(),
    ) {
        let bits = highest_bit(max_window);
        let window_a = window_a_seed % max_window + 1;
        let window_b = window_b_seed % max_window + 1;

        let key_a = encode_word(word_a, bits, window_a);
        let key_b = encode_word(word_b, bits, window_b);
        prop_assert_eq!(window_of(key_a, bits), window_a);
        if window_a != window_b || word_a != word_b {
            prop_assert_ne!(key_a, key_b);
        }
    }

    #[test]
    fn merge_does_not_depend_on_window_order(
        (n_instances, per_window, shuffled) in windows_strategy(),
    ) {
        let forward = merge_bags(n_instances, per_window.iter().map(Vec::as_slice));
        let permuted = merge_bags(n_instances, shuffled.iter().map(Vec::as_slice));

        prop_assert_eq!(&forward, &permuted);

        for (i, merged) in forward.iter().enumerate() {
            let expected: u64 = per_window
                .iter()
                .flat_map(|bags| bags[i].values())
                .map(|&c| u64::from(c))
                .sum();
            let total: u64 = merged.values().map(|&c| u64::from(c)).sum();
            prop_assert_eq!(total, expected);
        }
    }
}
