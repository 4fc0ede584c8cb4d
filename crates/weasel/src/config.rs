//! WEASEL configuration.

use serde::{Deserialize, Serialize};
use weasel_linear::LogisticRegressionConfig;
use weasel_sfa::{BinningStrategy, SfaConfig};

use crate::error::{Result, WeaselError};

/// Configuration for [`WeaselClassifier`](crate::WeaselClassifier).
///
/// # Example
///
/// ```rust,ignore
/// let config = WeaselConfig::default()
///     .with_window_inc(4)
///     .with_n_jobs(0)
///     .with_random_state(Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaselConfig {
    /// Select Fourier coefficients by ANOVA F statistic.
    pub anova: bool,
    /// Add bigrams of words one window apart.
    pub bigrams: bool,
    /// How each coefficient is discretized.
    pub binning_strategy: BinningStrategy,
    /// Window length step for series of length 100 or more.
    pub window_inc: usize,
    /// Words with a chi-squared p-value above this are dropped. `1.0` keeps all.
    pub p_threshold: f64,
    /// Worker threads; `0` uses every core.
    pub n_jobs: usize,
    /// Seed for the classifier's coordinate order. Overrides the
    /// classifier's own seed when set; the per-window draws never use it.
    pub random_state: Option<u64>,
    /// Smallest window length.
    pub min_window: usize,
    /// Cap on the window length, further clamped to the series length.
    pub max_window: usize,
    /// Symbols per Fourier coefficient.
    pub alphabet_size: usize,
    /// Word lengths drawn per window.
    pub word_lengths: Vec<usize>,
    /// Mean-normalization flags drawn per window.
    pub norm_options: Vec<bool>,
    /// Linear classifier settings.
    pub classifier: LogisticRegressionConfig,
}

impl Default for WeaselConfig {
    fn default() -> Self {
        Self {
            anova: true,
            bigrams: true,
            binning_strategy: BinningStrategy::InformationGain,
            window_inc: 2,
            p_threshold: 0.05,
            n_jobs: 1,
            random_state: None,
            min_window: 6,
            max_window: 100,
            alphabet_size: 4,
            word_lengths: vec![4, 6],
            norm_options: vec![false],
            classifier: LogisticRegressionConfig::default(),
        }
    }
}

impl WeaselConfig {
    /// Enable or disable ANOVA coefficient selection.
    #[must_use]
    pub fn with_anova(mut self, anova: bool) -> Self {
        self.anova = anova;
        self
    }

    /// Enable or disable bigrams.
    #[must_use]
    pub fn with_bigrams(mut self, bigrams: bool) -> Self {
        self.bigrams = bigrams;
        self
    }

    /// Set the binning strategy.
    #[must_use]
    pub fn with_binning_strategy(mut self, binning_strategy: BinningStrategy) -> Self {
        self.binning_strategy = binning_strategy;
        self
    }

    /// Set the window step.
    #[must_use]
    pub fn with_window_inc(mut self, window_inc: usize) -> Self {
        self.window_inc = window_inc;
        self
    }

    /// Set the chi-squared p-value threshold.
    #[must_use]
    pub fn with_p_threshold(mut self, p_threshold: f64) -> Self {
        self.p_threshold = p_threshold;
        self
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Set the classifier seed.
    #[must_use]
    pub fn with_random_state(mut self, random_state: Option<u64>) -> Self {
        self.random_state = random_state;
        self
    }

    /// Set the window bounds.
    #[must_use]
    pub fn with_window_range(mut self, min_window: usize, max_window: usize) -> Self {
        self.min_window = min_window;
        self.max_window = max_window;
        self
    }

    /// Set the alphabet size.
    #[must_use]
    pub fn with_alphabet_size(mut self, alphabet_size: usize) -> Self {
        self.alphabet_size = alphabet_size;
        self
    }

    /// Set the candidate word lengths.
    #[must_use]
    pub fn with_word_lengths(mut self, word_lengths: Vec<usize>) -> Self {
        self.word_lengths = word_lengths;
        self
    }

    /// Set the candidate normalization flags.
    #[must_use]
    pub fn with_norm_options(mut self, norm_options: Vec<bool>) -> Self {
        self.norm_options = norm_options;
        self
    }

    /// Set the classifier configuration.
    #[must_use]
    pub fn with_classifier(mut self, classifier: LogisticRegressionConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Whether the chi-squared gate runs.
    #[must_use]
    pub fn applies_chi_squared(&self) -> bool {
        self.p_threshold < 1.0
    }

    /// Classifier configuration with `random_state` applied as its seed.
    #[must_use]
    pub fn classifier_config(&self) -> LogisticRegressionConfig {
        match self.random_state {
            Some(seed) => self.classifier.clone().with_seed(seed),
            None => self.classifier.clone(),
        }
    }

    /// Extractor configuration for one window.
    #[must_use]
    pub fn sfa_config(&self, window_size: usize, word_length: usize, norm: bool) -> SfaConfig {
        SfaConfig::new(window_size)
            .with_word_length(word_length)
            .with_alphabet_size(self.alphabet_size)
            .with_norm(norm)
            .with_anova(self.anova)
            .with_binning_strategy(self.binning_strategy)
            .with_bigrams(self.bigrams)
    }

    /// Widest raw word any window can emit.
    #[must_use]
    pub fn max_word_bits(&self) -> u32 {
        self.word_lengths
            .iter()
            .map(|&wl| self.sfa_config(self.min_window, wl, false).max_word_bits())
            .max()
            .unwrap_or(0)
    }

    /// Check the options independently of any data.
    ///
    /// Window bounds against the series length are checked at fit time.
    pub fn validate(&self) -> Result<()> {
        if self.window_inc == 0 {
            return Err(WeaselError::Configuration(
                "window_inc must be at least 1".to_string(),
            ));
        }
        if !(self.p_threshold > 0.0 && self.p_threshold <= 1.0) {
            return Err(WeaselError::Configuration(format!(
                "p_threshold must be in (0, 1], got {}",
                self.p_threshold
            )));
        }
        if self.min_window == 0 {
            return Err(WeaselError::Configuration(
                "min_window must be at least 1".to_string(),
            ));
        }
        if self.min_window > self.max_window {
            return Err(WeaselError::Configuration(format!(
                "min_window {} exceeds max_window {}",
                self.min_window, self.max_window
            )));
        }
        if self.word_lengths.is_empty() {
            return Err(WeaselError::Configuration(
                "word_lengths must not be empty".to_string(),
            ));
        }
        if self.norm_options.is_empty() {
            return Err(WeaselError::Configuration(
                "norm_options must not be empty".to_string(),
            ));
        }

        // the smallest window offers the fewest Fourier values
        for &word_length in &self.word_lengths {
            for &norm in &self.norm_options {
                self.sfa_config(self.min_window, word_length, norm)
                    .validate()
                    .map_err(|e| WeaselError::Configuration(e.to_string()))?;
            }
        }

        self.classifier
            .validate()
            .map_err(|e| WeaselError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeaselConfig::default();
        assert!(config.anova);
        assert!(config.bigrams);
        assert_eq!(config.binning_strategy, BinningStrategy::InformationGain);
        assert_eq!(config.window_inc, 2);
        assert_eq!(config.p_threshold, 0.05);
        assert_eq!(config.n_jobs, 1);
        assert_eq!(config.random_state, None);
        assert_eq!((config.min_window, config.max_window), (6, 100));
        assert_eq!(config.word_lengths, vec![4, 6]);
        assert_eq!(config.norm_options, vec![false]);
        assert!(config.validate().is_ok());
        assert!(config.applies_chi_squared());
    }

    #[test]
    fn test_max_word_bits() {
        // 6 letters of 2 bits, doubled for bigrams plus the marker bit
        assert_eq!(WeaselConfig::default().max_word_bits(), 25);
        assert_eq!(
            WeaselConfig::default().with_bigrams(false).max_word_bits(),
            12
        );
    }

    #[test]
    fn test_invalid_options() {
        let bad = [
            WeaselConfig::default().with_window_inc(0),
            WeaselConfig::default().with_p_threshold(0.0),
            WeaselConfig::default().with_p_threshold(1.5),
            WeaselConfig::default().with_p_threshold(f64::NAN),
            WeaselConfig::default().with_window_range(0, 10),
            WeaselConfig::default().with_window_range(12, 8),
            WeaselConfig::default().with_word_lengths(vec![]),
            WeaselConfig::default().with_norm_options(vec![]),
            WeaselConfig::default().with_alphabet_size(1),
            WeaselConfig::default().with_word_lengths(vec![8]),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(WeaselError::Configuration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_random_state_seeds_the_classifier() {
        let classifier = LogisticRegressionConfig::default().with_seed(3);
        let config = WeaselConfig::default().with_classifier(classifier);
        assert_eq!(config.classifier_config().seed, 3);
        assert_eq!(config.with_random_state(Some(11)).classifier_config().seed, 11);
    }

    #[test]
    fn test_p_threshold_one_disables_gate() {
        assert!(!WeaselConfig::default()
            .with_p_threshold(1.0)
            .applies_chi_squared());
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let config: WeaselConfig =
            serde_json::from_str(r#"{"window_inc": 4, "binning_strategy": "equi-depth"}"#)
                .unwrap();
        assert_eq!(config.window_inc, 4);
        assert_eq!(config.binning_strategy, BinningStrategy::EquiDepth);
        assert_eq!(config.word_lengths, vec![4, 6]);
    }
}
