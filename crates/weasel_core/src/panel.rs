//! Validated time series panels.

use ndarray::{Array3, ArrayView2, Axis};

use crate::error::{CoreError, Result};

/// A read-only view over a `(N, D, L)` panel of time series.
///
/// Construction checks that the panel is non-empty and that every value of
/// the first dimension is finite. Only the first dimension is handed to the
/// word extractors.
///
/// # Example
///
/// ```rust
/// use ndarray::Array3;
/// use weasel_core::Panel;
///
/// let x = Array3::<f64>::zeros((4, 1, 32));
/// let panel = Panel::new(&x).unwrap();
/// assert_eq!(panel.n_instances(), 4);
/// assert_eq!(panel.series_length(), 32);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Panel<'a> {
    x: &'a Array3<f64>,
}

impl<'a> Panel<'a> {
    /// Wrap and validate a panel.
    ///
    /// # Errors
    ///
    /// Returns an error if any axis is empty or the first dimension contains
    /// NaN or infinite values.
    pub fn new(x: &'a Array3<f64>) -> Result<Self> {
        let (n, d, l) = x.dim();
        if n == 0 || d == 0 || l == 0 {
            return Err(CoreError::InvalidShape {
                expected: "(n_instances > 0, n_dims > 0, series_length > 0)".to_string(),
                got: format!("({n}, {d}, {l})"),
            });
        }

        let first = x.index_axis(Axis(1), 0);
        for ((instance, time), &value) in first.indexed_iter() {
            if !value.is_finite() {
                return Err(CoreError::InvalidValue {
                    instance,
                    time,
                    value,
                });
            }
        }

        Ok(Self { x })
    }

    /// Wrap a panel and check it against a label vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is invalid or the lengths differ.
    pub fn with_labels<L>(x: &'a Array3<f64>, labels: &[L]) -> Result<Self> {
        let panel = Self::new(x)?;
        if panel.n_instances() != labels.len() {
            return Err(CoreError::LabelMismatch {
                n_instances: panel.n_instances(),
                n_labels: labels.len(),
            });
        }
        Ok(panel)
    }

    /// Number of instances.
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.x.shape()[0]
    }

    /// Number of dimensions.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.x.shape()[1]
    }

    /// Series length.
    #[must_use]
    pub fn series_length(&self) -> usize {
        self.x.shape()[2]
    }

    /// The first dimension as an `(N, L)` view.
    #[must_use]
    pub fn first_dimension(&self) -> ArrayView2<'a, f64> {
        self.x.index_axis(Axis(1), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_shape() {
        let x = Array3::<f64>::zeros((3, 2, 10));
        let panel = Panel::new(&x).unwrap();
        assert_eq!(panel.n_instances(), 3);
        assert_eq!(panel.n_dims(), 2);
        assert_eq!(panel.series_length(), 10);
        assert_eq!(panel.first_dimension().dim(), (3, 10));
    }

    #[test]
    fn test_first_dimension_only() {
        let mut x = Array3::<f64>::zeros((2, 2, 4));
        x[[1, 0, 3]] = 5.0;
        x[[1, 1, 3]] = f64::NAN;
        let panel = Panel::new(&x).unwrap();
        assert_eq!(panel.first_dimension()[[1, 3]], 5.0);
    }

    #[test]
    fn test_empty_panel_rejected() {
        let x = Array3::<f64>::zeros((0, 1, 10));
        assert!(matches!(
            Panel::new(&x),
            Err(CoreError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut x = Array3::<f64>::zeros((2, 1, 4));
        x[[1, 0, 2]] = f64::INFINITY;
        match Panel::new(&x) {
            Err(CoreError::InvalidValue { instance, time, .. }) => {
                assert_eq!((instance, time), (1, 2));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_label_mismatch() {
        let x = Array3::<f64>::zeros((3, 1, 8));
        let labels = vec![0, 1];
        assert!(matches!(
            Panel::with_labels(&x, &labels),
            Err(CoreError::LabelMismatch {
                n_instances: 3,
                n_labels: 2
            })
        ));
    }
}
