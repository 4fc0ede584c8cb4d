//! Error types for the WEASEL pipeline.

use thiserror::Error;
use weasel_core::CoreError;
use weasel_linear::LinearError;
use weasel_sfa::SfaError;

/// Result type alias using [`WeaselError`].
pub type Result<T> = std::result::Result<T, WeaselError>;

/// Errors that can occur while fitting or querying a WEASEL classifier.
#[derive(Error, Debug)]
pub enum WeaselError {
    /// Options or window bounds that cannot produce a model.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The word extractor failed for one window.
    #[error("Word extraction failed for window {window_size}: {source}")]
    Extraction {
        /// Window the extractor was built for.
        window_size: usize,
        /// Underlying extractor error.
        #[source]
        source: SfaError,
    },

    /// The chi-squared relevance test failed for one window.
    #[error("Feature selection failed for window {window_size}: {source}")]
    Selection {
        /// Window whose words were being tested.
        window_size: usize,
        /// Underlying test error.
        #[source]
        source: LinearError,
    },

    /// The linear classifier could not be trained.
    #[error("Classifier training failed: {0}")]
    ClassifierTraining(#[source] LinearError),

    /// The linear classifier could not score the query.
    #[error("Prediction failed: {0}")]
    Prediction(#[source] LinearError),

    /// Prediction requested before a successful fit.
    #[error("WEASEL classifier is not fitted")]
    NotFitted,

    /// Invalid input data.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WeaselError {
    /// Window size the error is attributed to, if any.
    #[must_use]
    pub fn window_size(&self) -> Option<usize> {
        match self {
            Self::Extraction { window_size, .. } | Self::Selection { window_size, .. } => {
                Some(*window_size)
            }
            _ => None,
        }
    }
}
