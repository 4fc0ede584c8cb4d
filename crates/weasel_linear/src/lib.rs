//! # weasel_linear
//!
//! Sparse linear tooling for weasel-rs.
//!
//! This crate provides:
//! - [`DictVectorizer`] mapping word bags to sparse count matrices
//! - [`chi2`] for per-feature chi-squared relevance tests
//! - [`LogisticRegression`], an L2 logistic regression solved by coordinate descent
//! - [`LinearClassifier`] and [`SparseLogisticClassifier`] tying them together
//!
//! ## Example
//!
//! ```rust,ignore
//! use weasel_linear::{LinearClassifier, LogisticRegressionConfig, SparseLogisticClassifier};
//!
//! let mut clf = SparseLogisticClassifier::new(LogisticRegressionConfig::default())?;
//! clf.fit(&train_bags, &y_train, n_classes)?;
//! let proba = clf.predict_proba(&test_bags)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod chi2;
mod classifier;
mod error;
mod logistic;
mod sparse;
mod special;
mod vectorizer;

pub use chi2::{chi2, Chi2Result};
pub use classifier::{LinearClassifier, SparseLogisticClassifier};
pub use error::{LinearError, Result};
pub use logistic::{LogisticRegression, LogisticRegressionConfig, LogisticState};
pub use sparse::{CscMatrix, CsrMatrix};
pub use special::chi2_sf;
pub use vectorizer::DictVectorizer;
