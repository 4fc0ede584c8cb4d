//! Bag-of-words classifiers.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use weasel_core::WordBag;

use crate::error::{LinearError, Result};
use crate::logistic::{LogisticRegression, LogisticRegressionConfig, LogisticState};
use crate::vectorizer::DictVectorizer;

/// A classifier trained on per-instance word bags.
///
/// Class labels are indices in `0..n_classes`; mapping them back to user
/// labels is the caller's job.
pub trait LinearClassifier: Send + Sync {
    /// Learn the vocabulary and fit the model.
    fn fit(&mut self, bags: &[WordBag], y: &[usize], n_classes: usize) -> Result<()>;

    /// Raw scores, one column per binary model.
    fn decision_function(&self, bags: &[WordBag]) -> Result<Array2<f64>>;

    /// Class probabilities, shape `[n_bags, n_classes]`.
    fn predict_proba(&self, bags: &[WordBag]) -> Result<Array2<f64>>;

    /// Most likely class index per bag.
    fn predict(&self, bags: &[WordBag]) -> Result<Vec<usize>>;

    /// Number of learned features, 0 before fitting.
    fn n_features(&self) -> usize;

    /// Human readable model name.
    fn name(&self) -> &str {
        "classifier"
    }
}

/// [`DictVectorizer`] followed by [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseLogisticClassifier {
    vectorizer: DictVectorizer,
    model: LogisticRegression,
}

impl SparseLogisticClassifier {
    /// Create an unfitted classifier.
    pub fn new(config: LogisticRegressionConfig) -> Result<Self> {
        Ok(Self {
            vectorizer: DictVectorizer::new(),
            model: LogisticRegression::new(config)?,
        })
    }

    /// The learned vocabulary.
    #[must_use]
    pub fn vectorizer(&self) -> &DictVectorizer {
        &self.vectorizer
    }

    /// The fitted solver state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&LogisticState> {
        self.model.state()
    }

    /// Check that a fitted classifier is usable, e.g. after deserializing.
    ///
    /// # Errors
    ///
    /// [`LinearError::NotFitted`] without a solver state, otherwise
    /// [`LinearError::InvalidState`] for the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        let state = self.model.state().ok_or(LinearError::NotFitted)?;
        self.vectorizer.validate()?;
        state.validate()?;
        if state.n_features() != self.vectorizer.len() {
            return Err(LinearError::InvalidState(format!(
                "solver expects {} features but the vocabulary has {}",
                state.n_features(),
                self.vectorizer.len()
            )));
        }
        Ok(())
    }
}

impl LinearClassifier for SparseLogisticClassifier {
    fn fit(&mut self, bags: &[WordBag], y: &[usize], n_classes: usize) -> Result<()> {
        let mut vectorizer = DictVectorizer::new();
        let x = vectorizer.fit_transform(bags);
        let mut model = self.model.clone();
        model.fit(&x, y, n_classes)?;

        self.vectorizer = vectorizer;
        self.model = model;
        Ok(())
    }

    fn decision_function(&self, bags: &[WordBag]) -> Result<Array2<f64>> {
        if !self.model.is_fitted() {
            return Err(LinearError::NotFitted);
        }
        self.model.decision_function(&self.vectorizer.transform(bags))
    }

    fn predict_proba(&self, bags: &[WordBag]) -> Result<Array2<f64>> {
        if !self.model.is_fitted() {
            return Err(LinearError::NotFitted);
        }
        self.model.predict_proba(&self.vectorizer.transform(bags))
    }

    fn predict(&self, bags: &[WordBag]) -> Result<Vec<usize>> {
        if !self.model.is_fitted() {
            return Err(LinearError::NotFitted);
        }
        self.model.predict(&self.vectorizer.transform(bags))
    }

    fn n_features(&self) -> usize {
        self.vectorizer.len()
    }

    fn name(&self) -> &str {
        "logistic-regression"
    }
}
