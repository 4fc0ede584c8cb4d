//! Window-prefixed word keys.
//!
//! ```text
//!  63                 highest_bit            0
//! +----------------------+-------------------+
//! |  word                |  window_size      |
//! +----------------------+-------------------+
//! ```

use std::collections::BTreeSet;

use weasel_core::WordBag;

/// Pack a raw word and its window size into one key.
#[inline]
#[must_use]
pub fn encode_word(word: u64, highest_bit: u32, window_size: usize) -> u64 {
    (word << highest_bit) | window_size as u64
}

/// Window size stored in the low bits of `key`.
#[inline]
#[must_use]
pub fn window_of(key: u64, highest_bit: u32) -> usize {
    (key & ((1u64 << highest_bit) - 1)) as usize
}

/// Raw word stored in the high bits of `key`.
#[inline]
#[must_use]
pub fn word_of(key: u64, highest_bit: u32) -> u64 {
    key >> highest_bit
}

/// Re-key a raw bag, optionally keeping only `relevant` words.
#[must_use]
pub fn encode_bag(
    bag: &WordBag,
    highest_bit: u32,
    window_size: usize,
    relevant: Option<&BTreeSet<u64>>,
) -> WordBag {
    bag.iter()
        .filter(|(word, _)| relevant.map_or(true, |keep| keep.contains(word)))
        .map(|(&word, &count)| (encode_word(word, highest_bit, window_size), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_word() {
        assert_eq!(encode_word(0b101, 7, 12), (0b101 << 7) | 12);
        assert_eq!(window_of(encode_word(0b101, 7, 12), 7), 12);
        assert_eq!(word_of(encode_word(0b101, 7, 12), 7), 0b101);
    }

    #[test]
    fn test_same_word_different_windows() {
        let a = encode_word(42, 8, 10);
        let b = encode_word(42, 8, 11);
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_bag_filters() {
        let bag: WordBag = [(1, 3), (2, 1), (5, 2)].into_iter().collect();
        let keep: BTreeSet<u64> = [2, 5].into_iter().collect();

        let all = encode_bag(&bag, 4, 9, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all.get(&encode_word(1, 4, 9)), Some(&3));

        let kept = encode_bag(&bag, 4, 9, Some(&keep));
        assert_eq!(kept.len(), 2);
        assert!(!kept.contains_key(&encode_word(1, 4, 9)));
        assert_eq!(kept.get(&encode_word(5, 4, 9)), Some(&2));
    }
}
