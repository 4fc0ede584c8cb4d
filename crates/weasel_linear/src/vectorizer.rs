//! Dictionary vectorizer: bags of word keys to sparse count rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use weasel_core::WordBag;

use crate::error::{LinearError, Result};
use crate::sparse::CsrMatrix;

/// Maps word keys to matrix columns.
///
/// The vocabulary is learned by `fit` in order of first appearance (bags in
/// order, keys ascending within a bag) and frozen afterwards; `transform`
/// ignores keys outside the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictVectorizer {
    feature_names: Vec<u64>,
    vocabulary: BTreeMap<u64, usize>,
}

impl DictVectorizer {
    /// Create an empty vectorizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary from `bags`, replacing any previous one.
    pub fn fit(&mut self, bags: &[WordBag]) -> &mut Self {
        self.feature_names.clear();
        self.vocabulary.clear();
        for bag in bags {
            for &key in bag.keys() {
                if !self.vocabulary.contains_key(&key) {
                    self.vocabulary.insert(key, self.feature_names.len());
                    self.feature_names.push(key);
                }
            }
        }
        self
    }

    /// Learn the vocabulary and vectorize `bags`.
    pub fn fit_transform(&mut self, bags: &[WordBag]) -> CsrMatrix {
        self.fit(bags);
        self.transform(bags)
    }

    /// Vectorize `bags` against the learned vocabulary.
    #[must_use]
    pub fn transform(&self, bags: &[WordBag]) -> CsrMatrix {
        let mut matrix = CsrMatrix::new(self.feature_names.len());
        for bag in bags {
            matrix.push_row(bag.iter().filter_map(|(key, &count)| {
                self.vocabulary
                    .get(key)
                    .map(|&col| (col, f64::from(count)))
            }));
        }
        matrix
    }

    /// Check that keys and columns map one-to-one.
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.len() != self.feature_names.len() {
            return Err(LinearError::InvalidState(format!(
                "vocabulary has {} keys but {} feature names",
                self.vocabulary.len(),
                self.feature_names.len()
            )));
        }
        for (&key, &col) in &self.vocabulary {
            if self.feature_names.get(col) != Some(&key) {
                return Err(LinearError::InvalidState(format!(
                    "key {key} maps to column {col}, which names a different key"
                )));
            }
        }
        Ok(())
    }

    /// Keys in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[u64] {
        &self.feature_names
    }

    /// Column of a key, if known.
    #[must_use]
    pub fn index_of(&self, key: u64) -> Option<usize> {
        self.vocabulary.get(&key).copied()
    }

    /// Vocabulary size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    /// Check if the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(u64, u32)]) -> WordBag {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_first_appearance_order() {
        let bags = vec![bag(&[(30, 1), (10, 2)]), bag(&[(20, 5), (10, 1)])];
        let mut vec = DictVectorizer::new();
        let m = vec.fit_transform(&bags);

        assert_eq!(vec.feature_names(), &[10, 30, 20]);
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_cols(), 3);
        assert_eq!(m.row(0), (&[0usize, 1][..], &[2.0, 1.0][..]));
        assert_eq!(m.row(1), (&[0usize, 2][..], &[1.0, 5.0][..]));
    }

    #[test]
    fn test_unseen_keys_are_ignored() {
        let mut vec = DictVectorizer::new();
        vec.fit(&[bag(&[(1, 1), (2, 1)])]);

        let m = vec.transform(&[bag(&[(2, 3), (99, 7)]), WordBag::new()]);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.row(0), (&[1usize][..], &[3.0][..]));
        assert_eq!(m.row(1).0.len(), 0);
        assert_eq!(vec.index_of(99), None);
    }

    #[test]
    fn test_validate_catches_mismatched_columns() {
        let mut vec = DictVectorizer::new();
        vec.fit(&[bag(&[(1, 1), (2, 1)])]);
        assert!(vec.validate().is_ok());

        let mut json: serde_json::Value = serde_json::to_value(&vec).unwrap();
        json["vocabulary"]["2"] = serde_json::json!(7);
        let broken: DictVectorizer = serde_json::from_value(json).unwrap();
        assert!(matches!(broken.validate(), Err(LinearError::InvalidState(_))));
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut vec = DictVectorizer::new();
        let m = vec.fit_transform(&[WordBag::new(), WordBag::new()]);
        assert!(vec.is_empty());
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.nnz(), 0);
    }
}
