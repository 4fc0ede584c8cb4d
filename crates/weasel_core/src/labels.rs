//! Class label discovery and encoding.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Bound for values usable as class labels.
pub trait Label: Clone + Ord + Hash + Debug + Send + Sync {}

impl<T: Clone + Ord + Hash + Debug + Send + Sync> Label for T {}

/// The ordered set of classes observed at fit time.
///
/// Classes are kept sorted, so the column order of `predict_proba` is the
/// natural order of the label type and does not depend on which label
/// happened to appear first in the training data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabels<L> {
    classes: Vec<L>,
}

impl<L: Label> ClassLabels<L> {
    /// Discover classes from training labels and encode them as indices.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels` is empty.
    pub fn fit(labels: &[L]) -> Result<(Self, Vec<usize>)> {
        if labels.is_empty() {
            return Err(CoreError::Empty("no labels supplied".to_string()));
        }

        let classes: Vec<L> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let this = Self { classes };
        let encoded = this.encode(labels)?;
        Ok((this, encoded))
    }

    /// Encode labels as class indices.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownLabel`] for labels not seen at fit time.
    pub fn encode(&self, labels: &[L]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                self.index_of(label)
                    .ok_or_else(|| CoreError::UnknownLabel(format!("{label:?}")))
            })
            .collect()
    }

    /// Index of a label, if it was observed at fit time.
    #[must_use]
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.classes.binary_search(label).ok()
    }

    /// Label for a class index.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&L> {
        self.classes.get(index)
    }

    /// The classes in column order.
    #[must_use]
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no classes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sorts_classes() {
        let labels = vec!["b", "a", "c", "a", "b"];
        let (classes, encoded) = ClassLabels::fit(&labels).unwrap();
        assert_eq!(classes.classes(), &["a", "b", "c"]);
        assert_eq!(encoded, vec![1, 0, 2, 0, 1]);
    }

    #[test]
    fn test_round_trip_through_index() {
        let labels = vec![10_i64, -3, 10, 7];
        let (classes, encoded) = ClassLabels::fit(&labels).unwrap();
        let decoded: Vec<i64> = encoded
            .iter()
            .map(|&i| *classes.label(i).unwrap())
            .collect();
        assert_eq!(decoded, labels);
    }

    #[test]
    fn test_unknown_label() {
        let (classes, _) = ClassLabels::fit(&[1, 2]).unwrap();
        assert!(classes.index_of(&3).is_none());
        assert!(matches!(
            classes.encode(&[1, 3]),
            Err(CoreError::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_empty_labels() {
        let empty: Vec<u8> = Vec::new();
        assert!(matches!(ClassLabels::fit(&empty), Err(CoreError::Empty(_))));
    }
}
