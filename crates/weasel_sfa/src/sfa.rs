//! Symbolic Fourier Approximation (SFA) word extractor.
//!
//! SFA slides a window over each series, takes a DFT of every window, keeps
//! `word_length` real-valued coefficients and discretizes each one into one
//! of `alphabet_size` symbols. The symbols of a window form its word; the
//! words of a series form its bag-of-patterns.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use weasel_core::WordBag;

use crate::anova;
use crate::binning;
use crate::config::SfaConfig;
use crate::dft::WindowDft;
use crate::error::{Result, SfaError};

/// A word extractor with a fit/transform contract.
///
/// Implementations turn each row of an `(N, L)` view into a [`WordBag`] of
/// raw (window-agnostic) word keys. Fitting may learn state from the labels;
/// transforming must only apply the learned state.
pub trait WordExtractor: Send + Sync {
    /// Window length this extractor slides over each series.
    fn window_size(&self) -> usize;

    /// Upper bound on the bit width of emitted word keys.
    fn max_word_bits(&self) -> u32;

    /// Learn the extractor state and return the training bags.
    ///
    /// `labels` holds one class index per row of `series`.
    fn fit_transform(&mut self, series: ArrayView2<'_, f64>, labels: &[usize])
        -> Result<Vec<WordBag>>;

    /// Apply the learned state to new series.
    fn transform(&self, series: ArrayView2<'_, f64>) -> Result<Vec<WordBag>>;
}

/// State learned by [`Sfa::fit_transform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfaState {
    /// Indices of the DFT values that make up a word, in symbol order.
    pub support: Vec<usize>,
    /// Ascending finite thresholds for every selected coefficient.
    pub breakpoints: Vec<Vec<f64>>,
}

/// SFA extractor for one window size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sfa {
    config: SfaConfig,
    state: Option<SfaState>,
}

impl Sfa {
    /// Create an unfitted extractor.
    ///
    /// # Errors
    ///
    /// Returns [`SfaError::InvalidConfig`] if the configuration cannot
    /// produce words.
    pub fn new(config: SfaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    /// The extractor configuration.
    #[must_use]
    pub fn config(&self) -> &SfaConfig {
        &self.config
    }

    /// Learned state, if fitted.
    #[must_use]
    pub fn state(&self) -> Option<&SfaState> {
        self.state.as_ref()
    }

    /// Check if fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Check a deserialized extractor against its own configuration.
    ///
    /// # Errors
    ///
    /// [`SfaError::InvalidConfig`] for a bad configuration,
    /// [`SfaError::NotFitted`] without state and [`SfaError::InvalidState`]
    /// when the support or breakpoints cannot be applied.
    pub fn validate_state(&self) -> Result<()> {
        self.config.validate()?;
        let state = self.state.as_ref().ok_or(SfaError::NotFitted)?;
        let window_size = self.config.window_size;

        if state.support.len() != self.config.word_length
            || state.breakpoints.len() != self.config.word_length
        {
            return Err(SfaError::InvalidState(format!(
                "window {window_size}: {} support indices and {} breakpoint sets for word length {}",
                state.support.len(),
                state.breakpoints.len(),
                self.config.word_length
            )));
        }
        let dft_length = self.config.dft_length();
        if let Some(&coeff) = state.support.iter().find(|&&c| c >= dft_length) {
            return Err(SfaError::InvalidState(format!(
                "window {window_size}: support index {coeff} is out of range for {dft_length} Fourier values"
            )));
        }
        for (coeff, bps) in state.support.iter().zip(&state.breakpoints) {
            if bps.len() >= self.config.alphabet_size {
                return Err(SfaError::InvalidState(format!(
                    "window {window_size}: coefficient {coeff} has {} breakpoints for {} symbols",
                    bps.len(),
                    self.config.alphabet_size
                )));
            }
            let ascending =
                bps.iter().all(|bp| bp.is_finite()) && bps.windows(2).all(|w| w[0] <= w[1]);
            if !ascending {
                return Err(SfaError::InvalidState(format!(
                    "window {window_size}: breakpoints of coefficient {coeff} are not finite and ascending"
                )));
            }
        }
        Ok(())
    }

    fn dft(&self) -> WindowDft {
        WindowDft::new(
            self.config.window_size,
            self.config.dft_length(),
            self.config.norm,
        )
    }

    fn word(&self, state: &SfaState, dft_row: &[f64]) -> u64 {
        let letter_bits = self.config.letter_bits();
        state
            .support
            .iter()
            .zip(&state.breakpoints)
            .fold(0u64, |word, (&coeff, bps)| {
                (word << letter_bits) | binning::symbol(dft_row[coeff], bps) as u64
            })
    }

    fn bag(&self, words: &[u64]) -> WordBag {
        let mut bag = WordBag::new();
        for &word in words {
            *bag.entry(word).or_insert(0) += 1;
        }

        if self.config.bigrams {
            let word_bits = self.config.word_bits();
            let marker = 1u64 << (2 * word_bits);
            let w = self.config.window_size;
            for j in w..words.len() {
                let bigram = marker | (words[j - w] << word_bits) | words[j];
                *bag.entry(bigram).or_insert(0) += 1;
            }
        }
        bag
    }

    fn series_row(series: &ArrayView2<'_, f64>, i: usize) -> Vec<f64> {
        series.row(i).iter().copied().collect()
    }
}

impl WordExtractor for Sfa {
    fn window_size(&self) -> usize {
        self.config.window_size
    }

    fn max_word_bits(&self) -> u32 {
        self.config.max_word_bits()
    }

    fn fit_transform(
        &mut self,
        series: ArrayView2<'_, f64>,
        labels: &[usize],
    ) -> Result<Vec<WordBag>> {
        let n_instances = series.nrows();
        if labels.len() != n_instances {
            return Err(SfaError::InvalidInput(format!(
                "{} series but {} labels",
                n_instances,
                labels.len()
            )));
        }
        if series.ncols() < self.config.window_size {
            return Err(SfaError::InvalidInput(format!(
                "series length {} is shorter than window size {}",
                series.ncols(),
                self.config.window_size
            )));
        }

        let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
        let mut seen = vec![false; n_classes];
        for &label in labels {
            seen[label] = true;
        }
        let distinct = seen.iter().filter(|&&s| s).count();
        let supervised = self.config.anova || self.config.binning_strategy.is_supervised();
        if supervised && distinct < 2 {
            return Err(SfaError::DegenerateLabels(format!(
                "window {}: supervised coefficient selection needs at least 2 classes, got {}",
                self.config.window_size, distinct
            )));
        }

        let dft = self.dft();
        let per_instance: Vec<Vec<Vec<f64>>> = (0..n_instances)
            .map(|i| dft.sliding(&Self::series_row(&series, i)))
            .collect();

        let n_windows: usize = per_instance.iter().map(Vec::len).sum();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n_windows);
        let mut row_labels: Vec<usize> = Vec::with_capacity(n_windows);
        for (dfts, &label) in per_instance.iter().zip(labels) {
            rows.extend(dfts.iter().cloned());
            row_labels.extend(std::iter::repeat(label).take(dfts.len()));
        }

        let support = if self.config.anova {
            let scores = anova::f_statistics(&rows, &row_labels, n_classes);
            anova::select_best(&scores, self.config.word_length)
        } else {
            (0..self.config.word_length).collect()
        };

        let breakpoints = support
            .iter()
            .map(|&coeff| {
                let column: Vec<f64> = rows.iter().map(|row| row[coeff]).collect();
                binning::breakpoints(
                    &column,
                    &row_labels,
                    n_classes,
                    self.config.alphabet_size,
                    self.config.binning_strategy,
                )
            })
            .collect();

        let state = SfaState {
            support,
            breakpoints,
        };
        tracing::debug!(
            window_size = self.config.window_size,
            word_length = self.config.word_length,
            n_windows,
            support = ?state.support,
            "fitted SFA extractor"
        );

        let bags = per_instance
            .iter()
            .map(|dfts| {
                let words: Vec<u64> = dfts.iter().map(|row| self.word(&state, row)).collect();
                self.bag(&words)
            })
            .collect();

        self.state = Some(state);
        Ok(bags)
    }

    fn transform(&self, series: ArrayView2<'_, f64>) -> Result<Vec<WordBag>> {
        let state = self.state.as_ref().ok_or(SfaError::NotFitted)?;
        let dft = self.dft();

        Ok((0..series.nrows())
            .map(|i| {
                let words: Vec<u64> = dft
                    .sliding(&Self::series_row(&series, i))
                    .iter()
                    .map(|row| self.word(state, row))
                    .collect();
                self.bag(&words)
            })
            .collect())
    }
}
