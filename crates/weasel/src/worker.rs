//! Fitting one window: extract words, gate them, re-key them.

use std::collections::BTreeSet;

use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use weasel_core::{Seed, WordBag};
use weasel_linear::{chi2, DictVectorizer};
use weasel_sfa::{Sfa, WordExtractor};

use crate::config::WeaselConfig;
use crate::encode::encode_bag;
use crate::error::{Result, WeaselError};

/// Per-window diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowReport {
    /// Window length.
    pub window_size: usize,
    /// Drawn word length.
    pub word_length: usize,
    /// Drawn normalization flag.
    pub norm: bool,
    /// Distinct raw words seen in training.
    pub n_words: usize,
    /// Raw words kept by the chi-squared gate.
    pub n_relevant: usize,
}

/// Result of fitting one window.
#[derive(Debug, Clone)]
pub struct WindowFit {
    /// Fitted extractor, reused at inference.
    pub extractor: Sfa,
    /// Encoded training bags, one per instance.
    pub bags: Vec<WordBag>,
    /// Diagnostics.
    pub report: WindowReport,
}

/// Draw the word length and normalization flag for a window.
///
/// The draws depend only on the window size, so they do not change with
/// `random_state` or with the thread that runs the window.
pub fn draw_window_options(window_size: usize, config: &WeaselConfig) -> Result<(usize, bool)> {
    let mut rng: ChaCha8Rng = Seed::for_window(window_size).to_rng();
    let word_length = config
        .word_lengths
        .choose(&mut rng)
        .copied()
        .ok_or_else(|| WeaselError::Configuration("word_lengths must not be empty".to_string()))?;
    let norm = config
        .norm_options
        .choose(&mut rng)
        .copied()
        .ok_or_else(|| WeaselError::Configuration("norm_options must not be empty".to_string()))?;
    Ok((word_length, norm))
}

/// Raw words with a chi-squared p-value at or below `p_threshold`.
pub fn relevant_words(
    bags: &[WordBag],
    labels: &[usize],
    p_threshold: f64,
    window_size: usize,
) -> Result<BTreeSet<u64>> {
    let mut vectorizer = DictVectorizer::new();
    let x = vectorizer.fit_transform(bags);
    let result = chi2(&x, labels).map_err(|source| WeaselError::Selection {
        window_size,
        source,
    })?;

    Ok(result
        .relevant(p_threshold)
        .into_iter()
        .map(|j| vectorizer.feature_names()[j])
        .collect())
}

/// Fit the extractor for `window_size` and produce encoded bags.
pub fn fit_window(
    series: ArrayView2<'_, f64>,
    labels: &[usize],
    window_size: usize,
    highest_bit: u32,
    config: &WeaselConfig,
) -> Result<WindowFit> {
    let (word_length, norm) = draw_window_options(window_size, config)?;

    let extraction = |source| WeaselError::Extraction {
        window_size,
        source,
    };
    let mut extractor =
        Sfa::new(config.sfa_config(window_size, word_length, norm)).map_err(extraction)?;
    let raw = extractor.fit_transform(series, labels).map_err(extraction)?;

    let n_words = raw
        .iter()
        .flat_map(|bag| bag.keys())
        .collect::<BTreeSet<_>>()
        .len();

    let (bags, n_relevant) = if config.applies_chi_squared() {
        let relevant = relevant_words(&raw, labels, config.p_threshold, window_size)?;
        let bags = raw
            .iter()
            .map(|bag| encode_bag(bag, highest_bit, window_size, Some(&relevant)))
            .collect();
        (bags, relevant.len())
    } else {
        let bags = raw
            .iter()
            .map(|bag| encode_bag(bag, highest_bit, window_size, None))
            .collect();
        (bags, n_words)
    };

    tracing::debug!(
        window_size,
        word_length,
        norm,
        n_words,
        n_relevant,
        "Fitted window"
    );

    Ok(WindowFit {
        extractor,
        bags,
        report: WindowReport {
            window_size,
            word_length,
            norm,
            n_words,
            n_relevant,
        },
    })
}
