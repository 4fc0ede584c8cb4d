//! Multiple Coefficient Binning: per-coefficient breakpoints.
//!
//! Every selected Fourier coefficient gets at most `alphabet_size - 1`
//! finite, ascending thresholds. A value maps to the first bucket whose
//! threshold is greater than or equal to it, or to the last bucket when it
//! exceeds them all. Only finite thresholds are stored so fitted state
//! serializes cleanly.

use crate::config::BinningStrategy;

/// Thresholds for one coefficient column.
pub(crate) fn breakpoints(
    column: &[f64],
    labels: &[usize],
    n_classes: usize,
    alphabet_size: usize,
    strategy: BinningStrategy,
) -> Vec<f64> {
    let mut bps = match strategy {
        BinningStrategy::EquiDepth => equi_depth(column, alphabet_size),
        BinningStrategy::EquiWidth => equi_width(column, alphabet_size),
        BinningStrategy::InformationGain => {
            information_gain(column, labels, n_classes, alphabet_size)
        }
    };
    bps.retain(|bp| bp.is_finite());
    bps.truncate(alphabet_size - 1);
    bps
}

/// Symbol index of `value` under `breakpoints`.
pub(crate) fn symbol(value: f64, breakpoints: &[f64]) -> usize {
    breakpoints
        .iter()
        .position(|&bp| value <= bp)
        .unwrap_or(breakpoints.len())
}

fn equi_depth(column: &[f64], alphabet_size: usize) -> Vec<f64> {
    if column.is_empty() {
        return Vec::new();
    }
    let mut sorted = column.to_vec();
    sorted.sort_by(f64::total_cmp);

    let depth = sorted.len() as f64 / alphabet_size as f64;
    (1..alphabet_size)
        .map(|bp| {
            let idx = ((depth * bp as f64) as usize).min(sorted.len() - 1);
            sorted[idx]
        })
        .collect()
}

fn equi_width(column: &[f64], alphabet_size: usize) -> Vec<f64> {
    let min = column.iter().copied().fold(f64::INFINITY, f64::min);
    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let width = (max - min) / alphabet_size as f64;
    (1..alphabet_size).map(|bp| min + width * bp as f64).collect()
}

/// Best-first entropy splits, at most `alphabet_size` buckets.
fn information_gain(
    column: &[f64],
    labels: &[usize],
    n_classes: usize,
    alphabet_size: usize,
) -> Vec<f64> {
    let mut pairs: Vec<(f64, usize)> = column.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    let total = pairs.len() as f64;

    let mut leaves: Vec<(usize, usize)> = vec![(0, pairs.len())];
    let mut thresholds = Vec::with_capacity(alphabet_size - 1);

    while leaves.len() < alphabet_size {
        let best = leaves
            .iter()
            .enumerate()
            .filter_map(|(leaf_idx, &(start, end))| {
                best_split(&pairs[start..end], n_classes)
                    .map(|(pos, gain)| (leaf_idx, start + pos, gain * (end - start) as f64 / total))
            })
            .max_by(|a, b| a.2.total_cmp(&b.2).then(b.0.cmp(&a.0)));

        let Some((leaf_idx, split, _)) = best else {
            break;
        };
        let (start, end) = leaves[leaf_idx];
        thresholds.push((pairs[split - 1].0 + pairs[split].0) / 2.0);
        leaves[leaf_idx] = (start, split);
        leaves.push((split, end));
    }

    thresholds.sort_by(f64::total_cmp);
    thresholds
}

/// Best split position inside `pairs` and its information gain.
///
/// Returns `None` when no split improves purity.
fn best_split(pairs: &[(f64, usize)], n_classes: usize) -> Option<(usize, f64)> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mut right = vec![0usize; n_classes];
    for &(_, label) in pairs {
        right[label] += 1;
    }
    let parent = entropy(&right, n);
    if parent <= 0.0 {
        return None;
    }

    let mut left = vec![0usize; n_classes];
    let mut best: Option<(usize, f64)> = None;
    for pos in 1..n {
        let label = pairs[pos - 1].1;
        left[label] += 1;
        right[label] -= 1;
        if pairs[pos].0 <= pairs[pos - 1].0 {
            continue;
        }

        let n_left = pos as f64;
        let n_right = (n - pos) as f64;
        let child = (n_left * entropy(&left, pos) + n_right * entropy(&right, n - pos)) / n as f64;
        let gain = parent - child;
        if gain > 1e-12 && best.map_or(true, |(_, g)| gain > g) {
            best = Some((pos, gain));
        }
    }
    best
}

fn entropy(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equi_depth_quartiles() {
        let column: Vec<f64> = (0..8).map(f64::from).collect();
        let bps = breakpoints(&column, &[], 0, 4, BinningStrategy::EquiDepth);
        assert_eq!(bps, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_equi_width() {
        let column = vec![0.0, 10.0, 4.0];
        let bps = breakpoints(&column, &[], 0, 4, BinningStrategy::EquiWidth);
        assert_eq!(bps, vec![2.5, 5.0, 7.5]);
    }

    #[test]
    fn test_information_gain_finds_class_boundary() {
        let column = vec![0.1, 0.2, 0.3, 0.4, 5.1, 5.2, 5.3, 5.4];
        let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
        let bps = breakpoints(&column, &labels, 2, 4, BinningStrategy::InformationGain);

        // one pure split; the remaining buckets are unused
        assert_eq!(bps.len(), 1);
        assert!((bps[0] - 2.75).abs() < 1e-12);
        assert_eq!(symbol(0.3, &bps), 0);
        assert_eq!(symbol(5.2, &bps), 1);
    }

    #[test]
    fn test_information_gain_three_classes() {
        let column = vec![1.0, 1.1, 2.0, 2.1, 3.0, 3.1];
        let labels = vec![0, 0, 1, 1, 2, 2];
        let bps = breakpoints(&column, &labels, 3, 4, BinningStrategy::InformationGain);
        assert_eq!(bps.len(), 2);
        assert!((bps[0] - 1.55).abs() < 1e-12);
        assert!((bps[1] - 2.55).abs() < 1e-12);
    }

    #[test]
    fn test_symbol_lookup() {
        let bps = vec![-1.0, 0.0, 1.0];
        assert_eq!(symbol(-5.0, &bps), 0);
        assert_eq!(symbol(-1.0, &bps), 0);
        assert_eq!(symbol(-0.5, &bps), 1);
        assert_eq!(symbol(0.5, &bps), 2);
        assert_eq!(symbol(100.0, &bps), 3);
    }

    #[test]
    fn test_empty_column() {
        let bps = breakpoints(&[], &[], 2, 4, BinningStrategy::EquiDepth);
        assert!(bps.is_empty());
        assert_eq!(symbol(3.0, &bps), 0);
    }
}
