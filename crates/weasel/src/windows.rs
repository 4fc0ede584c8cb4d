//! Window size schedule.
//!
//! Window lengths start at `min_window` and advance by the effective step
//! while strictly below `max_window`, where `max_window` is the configured
//! cap clamped to the series length. Series shorter than 100 always step by
//! one. A series exactly `min_window` long gets the single window
//! `[min_window]`.

use serde::{Deserialize, Serialize};
use weasel_sfa::ceil_log2;

use crate::error::{Result, WeaselError};

/// Series length below which every window length is tried.
pub const SHORT_SERIES_LENGTH: usize = 100;

/// Window lengths to sweep for one fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSchedule {
    /// Window lengths in ascending order.
    pub window_sizes: Vec<usize>,
    /// Effective upper bound.
    pub max_window: usize,
    /// Effective step.
    pub window_inc: usize,
    /// Bits reserved for the window length in encoded keys.
    pub highest_bit: u32,
}

/// Step actually used for a series of `series_length`.
#[must_use]
pub fn effective_window_inc(series_length: usize, window_inc: usize) -> usize {
    if series_length < SHORT_SERIES_LENGTH {
        1
    } else {
        window_inc
    }
}

/// Bits needed so every window up to `max_window` fits below the word.
#[must_use]
pub fn highest_bit(max_window: usize) -> u32 {
    ceil_log2(max_window) + 1
}

/// Derive the windows for a series of `series_length`.
///
/// # Errors
///
/// Returns [`WeaselError::Configuration`] if `min_window` exceeds the
/// effective maximum or the step is zero.
pub fn schedule_windows(
    series_length: usize,
    min_window: usize,
    max_window: usize,
    window_inc: usize,
) -> Result<WindowSchedule> {
    if window_inc == 0 {
        return Err(WeaselError::Configuration(
            "window_inc must be at least 1".to_string(),
        ));
    }
    let max_window = max_window.min(series_length);
    if min_window > max_window {
        return Err(WeaselError::Configuration(format!(
            "min_window {min_window} exceeds max_window {max_window} (series length {series_length})"
        )));
    }

    let window_inc = effective_window_inc(series_length, window_inc);
    let window_sizes = if min_window == max_window {
        vec![min_window]
    } else {
        (min_window..max_window).step_by(window_inc).collect()
    };

    Ok(WindowSchedule {
        window_sizes,
        max_window,
        window_inc,
        highest_bit: highest_bit(max_window),
    })
}
