//! Chi-squared statistics between non-negative count features and classes.

use crate::error::{LinearError, Result};
use crate::sparse::CsrMatrix;
use crate::special::chi2_sf;

/// Per-column chi-squared statistics and p-values.
#[derive(Debug, Clone, PartialEq)]
pub struct Chi2Result {
    /// Test statistic per column.
    pub statistics: Vec<f64>,
    /// Survival-function p-value per column.
    pub p_values: Vec<f64>,
}

impl Chi2Result {
    /// Columns with `p <= threshold`, ascending.
    #[must_use]
    pub fn relevant(&self, threshold: f64) -> Vec<usize> {
        self.p_values
            .iter()
            .enumerate()
            .filter(|(_, &p)| p <= threshold)
            .map(|(j, _)| j)
            .collect()
    }
}

/// Chi-squared test of each column of `x` against class indices `y`.
///
/// Observed counts are the class-wise column sums; expected counts are the
/// class frequency times the column total. Degrees of freedom are the number
/// of distinct classes minus one.
pub fn chi2(x: &CsrMatrix, y: &[usize]) -> Result<Chi2Result> {
    if x.n_rows() != y.len() {
        return Err(LinearError::ShapeMismatch(format!(
            "{} rows but {} labels",
            x.n_rows(),
            y.len()
        )));
    }

    let n_classes = y.iter().max().map_or(0, |&m| m + 1);
    let mut class_counts = vec![0usize; n_classes];
    for &label in y {
        class_counts[label] += 1;
    }
    let present: Vec<usize> = (0..n_classes).filter(|&k| class_counts[k] > 0).collect();
    if present.len() < 2 {
        return Err(LinearError::DegenerateLabels(format!(
            "chi-squared test needs at least two classes, got {}",
            present.len()
        )));
    }

    let n_cols = x.n_cols();
    let mut observed = vec![vec![0.0; n_cols]; n_classes];
    let mut totals = vec![0.0; n_cols];
    for (i, &label) in y.iter().enumerate() {
        let (cols, vals) = x.row(i);
        for (&j, &v) in cols.iter().zip(vals) {
            observed[label][j] += v;
            totals[j] += v;
        }
    }

    let n = y.len() as f64;
    let df = (present.len() - 1) as f64;
    let mut statistics = vec![0.0; n_cols];
    for &k in &present {
        let freq = class_counts[k] as f64 / n;
        for j in 0..n_cols {
            let expected = freq * totals[j];
            let diff = observed[k][j] - expected;
            statistics[j] += diff * diff / expected;
        }
    }
    let p_values = statistics.iter().map(|&s| chi2_sf(s, df)).collect();

    Ok(Chi2Result {
        statistics,
        p_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_match_hand_computation() {
        // column 0 only occurs in class 0, column 1 is uniform
        let x = CsrMatrix::from_dense(&[
            vec![2.0, 1.0],
            vec![2.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ]);
        let result = chi2(&x, &[0, 0, 1, 1]).unwrap();

        // observed [4, 0], expected [2, 2]
        assert!((result.statistics[0] - 4.0).abs() < 1e-12);
        assert!(result.statistics[1].abs() < 1e-12);
        assert!((result.p_values[0] - 0.045_500_263_896_358_4).abs() < 1e-9);
        assert!((result.p_values[1] - 1.0).abs() < 1e-12);
        assert_eq!(result.relevant(0.05), vec![0]);
    }

    #[test]
    fn test_three_classes_degrees_of_freedom() {
        let x = CsrMatrix::from_dense(&[vec![3.0], vec![0.0], vec![0.0]]);
        let result = chi2(&x, &[0, 1, 2]).unwrap();
        // observed [3, 0, 0], expected [1, 1, 1] -> 4 + 1 + 1
        assert!((result.statistics[0] - 6.0).abs() < 1e-12);
        assert!((result.p_values[0] - (-3.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = CsrMatrix::from_dense(&[vec![1.0], vec![2.0]]);
        assert!(matches!(
            chi2(&x, &[1, 1]),
            Err(LinearError::DegenerateLabels(_))
        ));
    }

    #[test]
    fn test_label_count_mismatch() {
        let x = CsrMatrix::from_dense(&[vec![1.0]]);
        assert!(matches!(
            chi2(&x, &[0, 1]),
            Err(LinearError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut x = CsrMatrix::new(0);
        x.push_row(Vec::new());
        x.push_row(Vec::new());
        let result = chi2(&x, &[0, 1]).unwrap();
        assert!(result.p_values.is_empty());
        assert!(result.relevant(0.05).is_empty());
    }
}
