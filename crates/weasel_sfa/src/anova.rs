//! One-way ANOVA F-test for Fourier coefficient selection.

/// F statistic of every column of `rows` against `labels`.
///
/// `labels` must hold class indices below `n_classes`. Columns that are
/// constant everywhere score 0; columns constant within each class but
/// different between classes score `+inf`.
pub(crate) fn f_statistics(rows: &[Vec<f64>], labels: &[usize], n_classes: usize) -> Vec<f64> {
    let n_cols = rows.first().map_or(0, Vec::len);
    let n = rows.len();

    let mut counts = vec![0usize; n_classes];
    for &label in labels {
        counts[label] += 1;
    }
    let present = counts.iter().filter(|&&c| c > 0).count();
    if present < 2 || n <= present {
        return vec![0.0; n_cols];
    }
    let df_between = (present - 1) as f64;
    let df_within = (n - present) as f64;

    (0..n_cols)
        .map(|col| {
            let mut sums = vec![0.0; n_classes];
            let mut total = 0.0;
            for (row, &label) in rows.iter().zip(labels) {
                sums[label] += row[col];
                total += row[col];
            }
            let grand_mean = total / n as f64;

            let means: Vec<f64> = sums
                .iter()
                .zip(&counts)
                .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
                .collect();

            let ss_between: f64 = means
                .iter()
                .zip(&counts)
                .map(|(&m, &c)| c as f64 * (m - grand_mean).powi(2))
                .sum();
            let ss_within: f64 = rows
                .iter()
                .zip(labels)
                .map(|(row, &label)| (row[col] - means[label]).powi(2))
                .sum();

            let f = (ss_between / df_between) / (ss_within / df_within);
            if f.is_nan() {
                0.0
            } else {
                f
            }
        })
        .collect()
}

/// Indices of the `k` highest scores, best first; ties keep column order.
pub(crate) fn select_best(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(k);
    order
}
