//! Compressed sparse row and column matrices.

use serde::{Deserialize, Serialize};

/// A sparse matrix in compressed sparse row (CSR) layout.
///
/// ```text
/// row i  ->  indices[indptr[i]..indptr[i + 1]]   (column ids)
///            data[indptr[i]..indptr[i + 1]]      (values)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create an empty matrix with `n_cols` columns and no rows.
    #[must_use]
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from dense rows, dropping zeros.
    #[must_use]
    pub fn from_dense(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut matrix = Self::new(n_cols);
        for row in rows {
            matrix.push_row(
                row.iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0.0)
                    .map(|(j, &v)| (j, v)),
            );
        }
        matrix
    }

    /// Append a row from `(column, value)` entries.
    ///
    /// Entries are stored sorted by column; columns must be below `n_cols`.
    pub fn push_row(&mut self, entries: impl IntoIterator<Item = (usize, f64)>) {
        let mut row: Vec<(usize, f64)> = entries.into_iter().collect();
        row.sort_by_key(|&(j, _)| j);
        for (j, v) in row {
            debug_assert!(j < self.n_cols, "column {j} out of bounds");
            self.indices.push(j);
            self.data.push(v);
        }
        self.indptr.push(self.indices.len());
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Column ids and values of row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Dot product of row `i` with a dense vector.
    #[must_use]
    pub fn row_dot(&self, i: usize, dense: &[f64]) -> f64 {
        let (cols, vals) = self.row(i);
        cols.iter().zip(vals).map(|(&j, &v)| dense[j] * v).sum()
    }

    /// Convert to column-major layout.
    #[must_use]
    pub fn to_csc(&self) -> CscMatrix {
        let mut counts = vec![0usize; self.n_cols + 1];
        for &j in &self.indices {
            counts[j + 1] += 1;
        }
        for j in 0..self.n_cols {
            counts[j + 1] += counts[j];
        }

        let indptr = counts.clone();
        let mut next = counts;
        let mut indices = vec![0usize; self.nnz()];
        let mut data = vec![0.0; self.nnz()];
        for i in 0..self.n_rows() {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                let slot = next[j];
                indices[slot] = i;
                data[slot] = v;
                next[j] += 1;
            }
        }

        CscMatrix {
            n_rows: self.n_rows(),
            indptr,
            indices,
            data,
        }
    }
}

/// A sparse matrix in compressed sparse column (CSC) layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    n_rows: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CscMatrix {
    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Row ids and values of column `j`.
    #[must_use]
    pub fn col(&self, j: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[j]..self.indptr[j + 1];
        (&self.indices[range.clone()], &self.data[range])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix {
        CsrMatrix::from_dense(&[
            vec![1.0, 0.0, 2.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 3.0, 4.0],
        ])
    }

    #[test]
    fn test_csr_layout() {
        let m = sample();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 3);
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.row(0), (&[0usize, 2][..], &[1.0, 2.0][..]));
        assert_eq!(m.row(1).0.len(), 0);
        assert_eq!(m.row_dot(2, &[1.0, 1.0, 0.5]), 5.0);
    }

    #[test]
    fn test_push_row_sorts_columns() {
        let mut m = CsrMatrix::new(4);
        m.push_row(vec![(3, 1.0), (0, 2.0)]);
        assert_eq!(m.row(0), (&[0usize, 3][..], &[2.0, 1.0][..]));
    }

    #[test]
    fn test_to_csc() {
        let csc = sample().to_csc();
        assert_eq!(csc.n_rows(), 3);
        assert_eq!(csc.n_cols(), 3);
        assert_eq!(csc.col(0), (&[0usize][..], &[1.0][..]));
        assert_eq!(csc.col(1), (&[2usize][..], &[3.0][..]));
        assert_eq!(csc.col(2), (&[0usize, 2][..], &[2.0, 4.0][..]));
    }
}
