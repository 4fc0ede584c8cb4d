//! Trained WEASEL model: stored extractors, classifier and persistence.

use std::path::Path;

use ndarray::{Array2, Array3, ArrayView2};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use weasel_core::{ClassLabels, CoreError, Label, Panel, WordBag};
use weasel_linear::{LinearClassifier, SparseLogisticClassifier};
use weasel_sfa::{Sfa, WordExtractor};

use crate::config::WeaselConfig;
use crate::encode::encode_bag;
use crate::error::{Result, WeaselError};
use crate::merge::merge_into;
use crate::worker::WindowReport;

/// Diagnostics collected during a fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// Training instances.
    pub n_instances: usize,
    /// Training series length.
    pub series_length: usize,
    /// Effective window bound.
    pub max_window: usize,
    /// Effective window step.
    pub window_inc: usize,
    /// Bits reserved for the window length in each key.
    pub highest_bit: u32,
    /// One report per window, in schedule order.
    pub windows: Vec<WindowReport>,
    /// Vocabulary size of the merged representation.
    pub n_features: usize,
    /// Number of classes.
    pub n_classes: usize,
    /// Solver passes per binary model.
    pub classifier_iterations: Vec<usize>,
    /// Whether the solver reached its tolerance.
    pub classifier_converged: bool,
    /// Wall-clock fit time.
    pub fit_time_secs: f64,
}

impl FitSummary {
    /// Window lengths in schedule order.
    #[must_use]
    pub fn window_sizes(&self) -> Vec<usize> {
        self.windows.iter().map(|w| w.window_size).collect()
    }

    /// Raw words kept across all windows.
    #[must_use]
    pub fn n_relevant(&self) -> usize {
        self.windows.iter().map(|w| w.n_relevant).sum()
    }
}

/// Everything needed to classify new series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "L: Serialize", deserialize = "L: DeserializeOwned"))]
pub struct TrainedModel<L> {
    config: WeaselConfig,
    classes: ClassLabels<L>,
    extractors: Vec<Sfa>,
    classifier: SparseLogisticClassifier,
    highest_bit: u32,
    summary: FitSummary,
}

impl<L: Label> TrainedModel<L> {
    pub(crate) fn new(
        config: WeaselConfig,
        classes: ClassLabels<L>,
        extractors: Vec<Sfa>,
        classifier: SparseLogisticClassifier,
        summary: FitSummary,
    ) -> Self {
        Self {
            config,
            classes,
            extractors,
            classifier,
            highest_bit: summary.highest_bit,
            summary,
        }
    }

    /// Configuration used for the fit.
    #[must_use]
    pub fn config(&self) -> &WeaselConfig {
        &self.config
    }

    /// Classes in `predict_proba` column order.
    #[must_use]
    pub fn classes(&self) -> &[L] {
        self.classes.classes()
    }

    /// Fitted extractors in window order.
    #[must_use]
    pub fn extractors(&self) -> &[Sfa] {
        &self.extractors
    }

    /// Window lengths in fit order.
    #[must_use]
    pub fn window_sizes(&self) -> Vec<usize> {
        self.extractors.iter().map(WordExtractor::window_size).collect()
    }

    /// Bits reserved for the window length in each key.
    #[must_use]
    pub fn highest_bit(&self) -> u32 {
        self.highest_bit
    }

    /// The fitted linear classifier.
    #[must_use]
    pub fn classifier(&self) -> &SparseLogisticClassifier {
        &self.classifier
    }

    /// Fit diagnostics.
    #[must_use]
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    /// Merged bag of every series in `x`.
    ///
    /// Each stored extractor applies its learned state; no words are
    /// filtered. Extractors whose window is longer than the series add
    /// nothing.
    pub fn transform(&self, x: &Array3<f64>) -> Result<Vec<WordBag>> {
        let panel = Panel::new(x)?;
        let series = panel.first_dimension();
        self.transform_view(series)
    }

    fn transform_view(&self, series: ArrayView2<'_, f64>) -> Result<Vec<WordBag>> {
        let per_window = self
            .extractors
            .par_iter()
            .filter(|extractor| extractor.window_size() <= series.ncols())
            .map(|extractor| {
                let window_size = extractor.window_size();
                let raw = extractor
                    .transform(series)
                    .map_err(|source| WeaselError::Extraction {
                        window_size,
                        source,
                    })?;
                Ok(raw
                    .iter()
                    .map(|bag| encode_bag(bag, self.highest_bit, window_size, None))
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut merged = vec![WordBag::new(); series.nrows()];
        for bags in &per_window {
            merge_into(&mut merged, bags);
        }
        Ok(merged)
    }

    /// Predicted label per series.
    pub fn predict(&self, x: &Array3<f64>) -> Result<Vec<L>> {
        let bags = self.transform(x)?;
        let indices = self
            .classifier
            .predict(&bags)
            .map_err(WeaselError::Prediction)?;
        indices
            .into_iter()
            .map(|idx| {
                self.classes.label(idx).cloned().ok_or_else(|| {
                    WeaselError::Core(CoreError::UnknownLabel(format!("class index {idx}")))
                })
            })
            .collect()
    }

    /// Class probabilities, shape `[n_series, n_classes]`.
    pub fn predict_proba(&self, x: &Array3<f64>) -> Result<Array2<f64>> {
        let bags = self.transform(x)?;
        self.classifier
            .predict_proba(&bags)
            .map_err(WeaselError::Prediction)
    }

    /// Reject state that would make inference fail or panic.
    fn check(&self) -> Result<()> {
        self.classifier
            .validate()
            .map_err(|e| WeaselError::Serialization(e.to_string()))?;
        let n_classes = self.classifier.state().map_or(0, |s| s.n_classes());
        if n_classes != self.classes.len() {
            return Err(WeaselError::Serialization(format!(
                "classifier has {} classes but {} labels are stored",
                n_classes,
                self.classes.len()
            )));
        }
        for extractor in self.extractors() {
            extractor
                .validate_state()
                .map_err(|e| WeaselError::Serialization(e.to_string()))?;
        }
        let limit = 1usize.checked_shl(self.highest_bit).filter(|_| self.highest_bit < 64);
        let too_wide = |w: usize| limit.map_or(true, |limit| w >= limit);
        if let Some(&w) = self.window_sizes().iter().find(|&&w| too_wide(w)) {
            return Err(WeaselError::Serialization(format!(
                "window {w} does not fit in {} bits",
                self.highest_bit
            )));
        }
        Ok(())
    }
}

impl<L: Label + Serialize + DeserializeOwned> TrainedModel<L> {
    /// Write the model as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WeaselError::Serialization(format!("Failed to serialize: {e}")))?;
        std::fs::write(path.as_ref(), json)?;
        tracing::info!(path = %path.as_ref().display(), "Saved WEASEL model");
        Ok(())
    }

    /// Read a model written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let model: Self = serde_json::from_str(&json)
            .map_err(|e| WeaselError::Serialization(format!("Failed to deserialize: {e}")))?;
        model.check()?;
        Ok(model)
    }
}
