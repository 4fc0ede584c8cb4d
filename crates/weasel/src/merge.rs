//! Union of per-window bags.

use weasel_core::WordBag;

/// Add every bag of `window_bags` into `merged`, instance by instance.
///
/// `merged` grows to the number of instances if it is shorter.
pub fn merge_into(merged: &mut Vec<WordBag>, window_bags: &[WordBag]) {
    if merged.len() < window_bags.len() {
        merged.resize_with(window_bags.len(), WordBag::new);
    }
    for (target, bag) in merged.iter_mut().zip(window_bags) {
        for (&key, &count) in bag {
            *target.entry(key).or_insert(0) += count;
        }
    }
}

/// Merge the bags of all windows into one bag per instance.
#[must_use]
pub fn merge_bags<'a>(
    n_instances: usize,
    per_window: impl IntoIterator<Item = &'a [WordBag]>,
) -> Vec<WordBag> {
    let mut merged = vec![WordBag::new(); n_instances];
    for bags in per_window {
        merge_into(&mut merged, bags);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(u64, u32)]) -> WordBag {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_counts_add_up() {
        let w1 = vec![bag(&[(1, 2)]), bag(&[(3, 1)])];
        let w2 = vec![bag(&[(1, 1), (2, 4)]), bag(&[])];
        let merged = merge_bags(2, [w1.as_slice(), w2.as_slice()]);

        assert_eq!(merged[0], bag(&[(1, 3), (2, 4)]));
        assert_eq!(merged[1], bag(&[(3, 1)]));
    }

    #[test]
    fn test_no_windows() {
        let merged = merge_bags(3, std::iter::empty());
        assert_eq!(merged, vec![WordBag::new(); 3]);
    }
}
