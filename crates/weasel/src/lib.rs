//! # weasel
//!
//! WEASEL (Word ExtrAction for time SEries cLassification) in Rust.
//!
//! The classifier turns each series into a bag of SFA words collected over
//! many window lengths, keys every word by its window, keeps the words that
//! pass a chi-squared relevance test and trains an L2 logistic regression on
//! the merged bags.
//!
//! ## Pipeline
//!
//! ```text
//! series -> window schedule -> per-window SFA fit (parallel)
//!        -> chi-squared gate -> window-tagged keys -> merge -> logistic regression
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use weasel::{WeaselClassifier, WeaselConfig};
//!
//! let config = WeaselConfig::default().with_n_jobs(0).with_random_state(Some(42));
//! let mut clf = WeaselClassifier::new(config);
//! clf.fit(&x_train, &y_train)?;
//! let accuracy = clf.score(&x_test, &y_test)?;
//!
//! let model = clf.model().unwrap();
//! model.save("weasel.json")?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod encode;
pub mod error;
pub mod merge;
pub mod model;
pub mod windows;
pub mod worker;

pub use classifier::WeaselClassifier;
pub use config::WeaselConfig;
pub use encode::{encode_word, window_of};
pub use error::{Result, WeaselError};
pub use merge::merge_bags;
pub use model::{FitSummary, TrainedModel};
pub use windows::{effective_window_inc, schedule_windows, WindowSchedule};
pub use worker::WindowReport;

pub use weasel_core::{Seed, WordBag};
pub use weasel_linear::LogisticRegressionConfig;
pub use weasel_sfa::BinningStrategy;
