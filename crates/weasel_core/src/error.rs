//! Error types for weasel_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors raised while validating inputs.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid panel shape provided.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        got: String,
    },

    /// Labels and instances disagree in length.
    #[error("Label count mismatch: {n_instances} instances but {n_labels} labels")]
    LabelMismatch {
        /// Number of instances in the panel.
        n_instances: usize,
        /// Number of labels supplied.
        n_labels: usize,
    },

    /// A non-finite value was found in the input.
    #[error("Invalid value at instance {instance}, time {time}: {value}")]
    InvalidValue {
        /// Instance index.
        instance: usize,
        /// Time index.
        time: usize,
        /// The offending value.
        value: f64,
    },

    /// A label was not seen at fit time.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Empty input.
    #[error("Empty input: {0}")]
    Empty(String),
}
