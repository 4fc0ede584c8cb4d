//! Sklearn-like WEASEL classifier.

use std::time::Instant;

use ndarray::{Array2, Array3};
use rayon::ThreadPool;
use weasel_core::{ClassLabels, Label, Panel, WordBag};
use weasel_linear::{LinearClassifier, SparseLogisticClassifier};

use crate::config::WeaselConfig;
use crate::coordinator::{build_pool, fit_windows};
use crate::error::{Result, WeaselError};
use crate::merge::merge_into;
use crate::model::{FitSummary, TrainedModel};
use crate::windows::schedule_windows;

/// WEASEL time series classifier.
///
/// Fitting sweeps a range of window lengths, extracts SFA words for each,
/// keeps the words that pass a chi-squared relevance test, tags every word
/// with its window and trains an L2 logistic regression on the merged bags.
///
/// # Example
///
/// ```rust,ignore
/// use weasel::{WeaselClassifier, WeaselConfig};
///
/// // x: (n_samples, n_dims, seq_len); only the first dimension is used
/// let mut clf = WeaselClassifier::new(WeaselConfig::default().with_n_jobs(0));
/// let summary = clf.fit(&x_train, &y_train)?;
/// let predictions = clf.predict(&x_test)?;
/// let probabilities = clf.predict_proba(&x_test)?;
/// ```
pub struct WeaselClassifier<L> {
    config: WeaselConfig,
    model: Option<TrainedModel<L>>,
    pool: Option<ThreadPool>,
}

impl<L: Label> WeaselClassifier<L> {
    /// Create an unfitted classifier.
    pub fn new(config: WeaselConfig) -> Self {
        Self {
            config,
            model: None,
            pool: None,
        }
    }

    /// Wrap a previously trained model.
    pub fn from_model(model: TrainedModel<L>) -> Result<Self> {
        let config = model.config().clone();
        let pool = build_pool(config.n_jobs)?;
        Ok(Self {
            config,
            model: Some(model),
            pool: Some(pool),
        })
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &WeaselConfig {
        &self.config
    }

    /// Check if a model is available.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&TrainedModel<L>> {
        self.model.as_ref()
    }

    /// Take the trained model out of the classifier.
    pub fn into_model(self) -> Option<TrainedModel<L>> {
        self.model
    }

    /// Classes in `predict_proba` column order.
    pub fn classes(&self) -> Result<&[L]> {
        self.fitted().map(|(model, _)| model.classes())
    }

    /// Fit on a panel of shape `(n_samples, n_dims, seq_len)` and one label
    /// per sample.
    ///
    /// On failure the previous model, if any, is kept.
    pub fn fit(&mut self, x: &Array3<f64>, y: &[L]) -> Result<FitSummary> {
        let start = Instant::now();
        self.config.validate()?;

        let panel = Panel::with_labels(x, y)?;
        let (classes, labels) = ClassLabels::fit(y)?;
        let schedule = schedule_windows(
            panel.series_length(),
            self.config.min_window,
            self.config.max_window,
            self.config.window_inc,
        )?;

        let key_bits = self.config.max_word_bits() + schedule.highest_bit;
        if key_bits > u64::BITS {
            return Err(WeaselError::Configuration(format!(
                "encoded words need {key_bits} bits, more than fit in a 64-bit key"
            )));
        }

        let mut classifier = SparseLogisticClassifier::new(self.config.classifier_config())
            .map_err(|e| WeaselError::Configuration(e.to_string()))?;
        let pool = build_pool(self.config.n_jobs)?;

        tracing::info!(
            n_instances = panel.n_instances(),
            series_length = panel.series_length(),
            n_classes = classes.len(),
            n_windows = schedule.window_sizes.len(),
            window_inc = schedule.window_inc,
            classifier = classifier.name(),
            "Fitting WEASEL"
        );

        let series = panel.first_dimension();
        let fits = fit_windows(&pool, series, &labels, &schedule, &self.config)?;

        let mut merged = vec![WordBag::new(); panel.n_instances()];
        for fit in &fits {
            merge_into(&mut merged, &fit.bags);
        }

        pool.install(|| classifier.fit(&merged, &labels, classes.len()))
            .map_err(WeaselError::ClassifierTraining)?;

        let (extractors, windows): (Vec<_>, Vec<_>) =
            fits.into_iter().map(|fit| (fit.extractor, fit.report)).unzip();
        let (classifier_iterations, classifier_converged) = classifier
            .state()
            .map(|s| (s.n_iter(), s.converged()))
            .unwrap_or_default();

        let summary = FitSummary {
            n_instances: panel.n_instances(),
            series_length: panel.series_length(),
            max_window: schedule.max_window,
            window_inc: schedule.window_inc,
            highest_bit: schedule.highest_bit,
            windows,
            n_features: classifier.n_features(),
            n_classes: classes.len(),
            classifier_iterations,
            classifier_converged,
            fit_time_secs: start.elapsed().as_secs_f64(),
        };

        tracing::info!(
            n_features = summary.n_features,
            n_relevant = summary.n_relevant(),
            converged = summary.classifier_converged,
            fit_time_secs = summary.fit_time_secs,
            "WEASEL fit complete"
        );

        self.model = Some(TrainedModel::new(
            self.config.clone(),
            classes,
            extractors,
            classifier,
            summary.clone(),
        ));
        self.pool = Some(pool);
        Ok(summary)
    }

    /// Predicted label per series.
    pub fn predict(&self, x: &Array3<f64>) -> Result<Vec<L>> {
        let (model, pool) = self.fitted()?;
        pool.install(|| model.predict(x))
    }

    /// Class probabilities, shape `(n_samples, n_classes)`.
    pub fn predict_proba(&self, x: &Array3<f64>) -> Result<Array2<f64>> {
        let (model, pool) = self.fitted()?;
        pool.install(|| model.predict_proba(x))
    }

    /// Merged, window-tagged bag of every series.
    pub fn transform(&self, x: &Array3<f64>) -> Result<Vec<WordBag>> {
        let (model, pool) = self.fitted()?;
        pool.install(|| model.transform(x))
    }

    /// Mean accuracy on labelled data.
    pub fn score(&self, x: &Array3<f64>, y: &[L]) -> Result<f64> {
        Panel::with_labels(x, y)?;
        let predictions = self.predict(x)?;
        let correct = predictions.iter().zip(y).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }

    fn fitted(&self) -> Result<(&TrainedModel<L>, &ThreadPool)> {
        match (&self.model, &self.pool) {
            (Some(model), Some(pool)) => Ok((model, pool)),
            _ => Err(WeaselError::NotFitted),
        }
    }
}
