//! Error types for weasel_sfa.

use thiserror::Error;

/// Result type alias using [`SfaError`].
pub type Result<T> = std::result::Result<T, SfaError>;

/// Errors raised while fitting or applying an SFA extractor.
#[derive(Error, Debug)]
pub enum SfaError {
    /// The extractor configuration cannot produce words.
    #[error("Invalid SFA configuration: {0}")]
    InvalidConfig(String),

    /// Supervised steps need at least two classes.
    #[error("Degenerate labels: {0}")]
    DegenerateLabels(String),

    /// Input does not match what the extractor expects.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Learned state that does not fit the configuration, e.g. after loading.
    #[error("Invalid SFA state: {0}")]
    InvalidState(String),

    /// `transform` called before `fit_transform`.
    #[error("SFA extractor is not fitted")]
    NotFitted,

    /// Unknown binning strategy name.
    #[error("Unknown binning strategy '{0}'. Supported: equi-depth, equi-width, information-gain")]
    UnknownBinning(String),
}
