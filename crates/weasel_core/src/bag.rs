//! Bag-of-patterns representation.

use std::collections::BTreeMap;

/// Occurrence counts of word keys for one instance.
///
/// Keys are either raw symbolic words (as produced by an extractor) or
/// window-prefixed feature keys (after encoding). A `BTreeMap` keeps
/// iteration order deterministic, which fixes the order in which a
/// vectorizer discovers its vocabulary.
pub type WordBag = BTreeMap<u64, u32>;

/// Total number of word occurrences in a bag.
#[must_use]
pub fn total_count(bag: &WordBag) -> u64 {
    bag.values().map(|&c| u64::from(c)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count() {
        let mut bag = WordBag::new();
        *bag.entry(3).or_insert(0) += 2;
        *bag.entry(9).or_insert(0) += 5;
        assert_eq!(total_count(&bag), 7);
        assert_eq!(total_count(&WordBag::new()), 0);
    }
}
