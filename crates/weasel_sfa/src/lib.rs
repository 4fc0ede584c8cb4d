//! # weasel_sfa
//!
//! Symbolic Fourier Approximation (SFA) for weasel-rs.
//!
//! This crate provides:
//! - [`WordExtractor`], the fit/transform contract the WEASEL pipeline uses
//! - [`Sfa`], a windowed DFT word extractor with ANOVA coefficient selection
//! - [`BinningStrategy`] for equi-depth, equi-width and information-gain binning
//!
//! ## Example
//!
//! ```rust,ignore
//! use weasel_sfa::{Sfa, SfaConfig, WordExtractor};
//!
//! let mut sfa = Sfa::new(SfaConfig::new(16).with_word_length(4))?;
//! let train_bags = sfa.fit_transform(x_train.view(), &y_train)?;
//! let test_bags = sfa.transform(x_test.view())?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod anova;
mod binning;
mod config;
mod dft;
mod error;
mod sfa;

pub use config::{ceil_log2, BinningStrategy, SfaConfig};
pub use error::{Result, SfaError};
pub use sfa::{Sfa, SfaState, WordExtractor};
