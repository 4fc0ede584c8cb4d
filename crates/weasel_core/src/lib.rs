//! # weasel_core
//!
//! Core types shared by the weasel-rs crates.
//!
//! This crate provides:
//! - [`Seed`] for deterministic, per-window random number generation
//! - [`Panel`] for validated `[instance, dimension, time]` input arrays
//! - [`ClassLabels`] for fixing the class order discovered at fit time
//! - [`WordBag`], the per-instance bag-of-patterns representation
//! - Error types and common utilities
//!
//! ## Shape Convention
//!
//! Time series panels follow the convention `(N, D, L)`:
//! - `N`: number of instances
//! - `D`: dimensions (only the first one is used by WEASEL)
//! - `L`: series length (time steps)
//!
//! ## Example
//!
//! ```rust,ignore
//! use weasel_core::{ClassLabels, Panel, Seed};
//!
//! let panel = Panel::new(&x)?;
//! let (classes, y) = ClassLabels::fit(&labels)?;
//! let mut rng = Seed::for_window(12).to_rng();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod bag;
mod error;
mod labels;
mod panel;
mod seed;

pub use bag::{total_count, WordBag};
pub use error::{CoreError, Result};
pub use labels::{ClassLabels, Label};
pub use panel::Panel;
pub use seed::Seed;
