//! Error types for weasel_linear.

use thiserror::Error;

/// Result type alias using [`LinearError`].
pub type Result<T> = std::result::Result<T, LinearError>;

/// Errors raised by the vectorizer, the chi-squared test and the solver.
#[derive(Error, Debug)]
pub enum LinearError {
    /// Inputs disagree in size.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A supervised step needs at least two classes.
    #[error("Degenerate labels: {0}")]
    DegenerateLabels(String),

    /// Invalid solver configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The solver produced non-finite weights.
    #[error("Numerical failure: {0}")]
    Numerical(String),

    /// Fitted state that is internally inconsistent, e.g. after loading.
    #[error("Invalid fitted state: {0}")]
    InvalidState(String),

    /// Prediction requested before fitting.
    #[error("Classifier is not fitted")]
    NotFitted,
}
