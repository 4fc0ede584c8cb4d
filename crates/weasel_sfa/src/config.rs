//! SFA extractor configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SfaError};

/// How Fourier coefficients are discretized into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinningStrategy {
    /// Equal number of training values per bucket.
    EquiDepth,
    /// Equal-width buckets between the observed min and max.
    EquiWidth,
    /// Splits chosen to maximize information gain w.r.t. the labels.
    #[default]
    InformationGain,
}

impl BinningStrategy {
    /// Canonical name of the strategy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EquiDepth => "equi-depth",
            Self::EquiWidth => "equi-width",
            Self::InformationGain => "information-gain",
        }
    }

    /// Whether the strategy needs class labels.
    #[must_use]
    pub const fn is_supervised(&self) -> bool {
        matches!(self, Self::InformationGain)
    }
}

impl fmt::Display for BinningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinningStrategy {
    type Err = SfaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "equi-depth" | "equi_depth" => Ok(Self::EquiDepth),
            "equi-width" | "equi_width" => Ok(Self::EquiWidth),
            "information-gain" | "information_gain" => Ok(Self::InformationGain),
            other => Err(SfaError::UnknownBinning(other.to_string())),
        }
    }
}

/// Configuration for one SFA extractor (one window size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfaConfig {
    /// Number of symbols per word.
    pub word_length: usize,
    /// Number of distinct symbols.
    pub alphabet_size: usize,
    /// Sliding window length.
    pub window_size: usize,
    /// Drop the DC coefficient (mean normalization).
    pub norm: bool,
    /// Select coefficients with a one-way ANOVA F-test instead of taking the leading ones.
    pub anova: bool,
    /// Discretization method.
    pub binning_strategy: BinningStrategy,
    /// Also emit pairs of words one window apart.
    pub bigrams: bool,
}

impl Default for SfaConfig {
    fn default() -> Self {
        Self {
            word_length: 4,
            alphabet_size: 4,
            window_size: 12,
            norm: false,
            anova: true,
            binning_strategy: BinningStrategy::InformationGain,
            bigrams: true,
        }
    }
}

impl SfaConfig {
    /// Create a config for a window size with default options.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            ..Default::default()
        }
    }

    /// Set the word length.
    #[must_use]
    pub fn with_word_length(mut self, word_length: usize) -> Self {
        self.word_length = word_length;
        self
    }

    /// Set the alphabet size.
    #[must_use]
    pub fn with_alphabet_size(mut self, alphabet_size: usize) -> Self {
        self.alphabet_size = alphabet_size;
        self
    }

    /// Set mean normalization.
    #[must_use]
    pub fn with_norm(mut self, norm: bool) -> Self {
        self.norm = norm;
        self
    }

    /// Set ANOVA coefficient selection.
    #[must_use]
    pub fn with_anova(mut self, anova: bool) -> Self {
        self.anova = anova;
        self
    }

    /// Set the binning strategy.
    #[must_use]
    pub fn with_binning_strategy(mut self, binning_strategy: BinningStrategy) -> Self {
        self.binning_strategy = binning_strategy;
        self
    }

    /// Set bigram extraction.
    #[must_use]
    pub fn with_bigrams(mut self, bigrams: bool) -> Self {
        self.bigrams = bigrams;
        self
    }

    /// Bits used to store one symbol.
    #[must_use]
    pub fn letter_bits(&self) -> u32 {
        ceil_log2(self.alphabet_size)
    }

    /// Bits used by a unigram word.
    #[must_use]
    pub fn word_bits(&self) -> u32 {
        self.letter_bits() * self.word_length as u32
    }

    /// Upper bound on the bit width of any emitted key.
    #[must_use]
    pub fn max_word_bits(&self) -> u32 {
        if self.bigrams {
            2 * self.word_bits() + 1
        } else {
            self.word_bits()
        }
    }

    /// Number of real DFT values computed per window.
    #[must_use]
    pub fn dft_length(&self) -> usize {
        if self.anova {
            self.window_size - self.window_size % 2
        } else {
            self.word_length
        }
    }

    /// Check that the configuration can produce words.
    ///
    /// # Errors
    ///
    /// Returns [`SfaError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !(2..=256).contains(&self.alphabet_size) {
            return Err(SfaError::InvalidConfig(format!(
                "alphabet_size must be in 2..=256, got {}",
                self.alphabet_size
            )));
        }
        if self.word_length == 0 {
            return Err(SfaError::InvalidConfig("word_length must be positive".to_string()));
        }
        if self.window_size < 2 {
            return Err(SfaError::InvalidConfig(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }
        if self.max_word_bits() > 63 {
            return Err(SfaError::InvalidConfig(format!(
                "words need {} bits, more than fit in a 64-bit key",
                self.max_word_bits()
            )));
        }

        let offset = usize::from(self.norm);
        let available = 2 * (self.window_size / 2 + 1 - offset);
        if self.dft_length() < self.word_length || self.dft_length() > available {
            return Err(SfaError::InvalidConfig(format!(
                "window_size {} provides {} Fourier values, dft_length {} cannot hold word_length {}",
                self.window_size,
                available,
                self.dft_length(),
                self.word_length
            )));
        }
        Ok(())
    }
}

/// `ceil(log2(n))` for `n >= 1`.
#[must_use]
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(100), 7);
        assert_eq!(ceil_log2(128), 7);
    }

    #[test]
    fn test_binning_parse() {
        assert_eq!(
            "equi-depth".parse::<BinningStrategy>().unwrap(),
            BinningStrategy::EquiDepth
        );
        assert_eq!(
            "Equi-Width".parse::<BinningStrategy>().unwrap(),
            BinningStrategy::EquiWidth
        );
        assert_eq!(
            "information-gain".parse::<BinningStrategy>().unwrap(),
            BinningStrategy::InformationGain
        );
        assert!("kmeans".parse::<BinningStrategy>().is_err());
    }

    #[test]
    fn test_binning_serde_names() {
        let json = serde_json::to_string(&BinningStrategy::EquiDepth).unwrap();
        assert_eq!(json, "\"equi-depth\"");
    }

    #[test]
    fn test_word_bits() {
        let config = SfaConfig::new(10).with_word_length(6);
        assert_eq!(config.letter_bits(), 2);
        assert_eq!(config.word_bits(), 12);
        assert_eq!(config.max_word_bits(), 25);
        assert_eq!(config.with_bigrams(false).max_word_bits(), 12);
    }

    #[test]
    fn test_dft_length() {
        let config = SfaConfig::new(7).with_word_length(4);
        assert_eq!(config.dft_length(), 6);
        assert_eq!(config.with_anova(false).dft_length(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(SfaConfig::new(6).with_word_length(6).validate().is_ok());
        assert!(SfaConfig::new(6)
            .with_word_length(6)
            .with_norm(true)
            .validate()
            .is_ok());
        assert!(SfaConfig::new(4).with_word_length(6).validate().is_err());
        assert!(SfaConfig::new(12).with_alphabet_size(1).validate().is_err());
        assert!(SfaConfig::new(12).with_word_length(0).validate().is_err());
    }
}
