//! Parallel dispatch of the per-window workers.

use ndarray::ArrayView2;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::config::WeaselConfig;
use crate::error::{Result, WeaselError};
use crate::windows::WindowSchedule;
use crate::worker::{fit_window, WindowFit};

/// Build the worker pool. `n_jobs == 0` uses every available core.
pub fn build_pool(n_jobs: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_jobs)
        .thread_name(|idx| format!("weasel-worker-{idx}"))
        .build()
        .map_err(|e| WeaselError::Configuration(format!("Failed to build thread pool: {e}")))
}

/// Fit every scheduled window on `pool`.
///
/// Results come back in schedule order regardless of completion order. The
/// first failing window aborts the whole fit.
pub fn fit_windows(
    pool: &ThreadPool,
    series: ArrayView2<'_, f64>,
    labels: &[usize],
    schedule: &WindowSchedule,
    config: &WeaselConfig,
) -> Result<Vec<WindowFit>> {
    tracing::debug!(
        n_windows = schedule.window_sizes.len(),
        min_window = schedule.window_sizes.first().copied(),
        max_window = schedule.max_window,
        window_inc = schedule.window_inc,
        n_threads = pool.current_num_threads(),
        "Dispatching window fits"
    );

    pool.install(|| {
        schedule
            .window_sizes
            .par_iter()
            .map(|&window_size| {
                fit_window(series, labels, window_size, schedule.highest_bit, config)
            })
            .collect::<Result<Vec<_>>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::schedule_windows;
    use ndarray::Array2;

    fn series() -> (Array2<f64>, Vec<usize>) {
        let mut x = Array2::zeros((8, 24));
        let mut y = Vec::new();
        for i in 0..8 {
            for t in 0..24 {
                x[[i, t]] = if i % 2 == 0 {
                    (t as f64 * 0.3).sin()
                } else {
                    (t as f64 * 1.7).cos()
                } + i as f64 * 0.01;
            }
            y.push(i % 2);
        }
        (x, y)
    }

    #[test]
    fn test_results_follow_schedule_order() {
        let (x, y) = series();
        let config = WeaselConfig::default().with_p_threshold(1.0);
        let schedule = schedule_windows(24, 6, 100, 2).unwrap();
        let pool = build_pool(4).unwrap();

        let fits = fit_windows(&pool, x.view(), &y, &schedule, &config).unwrap();
        let windows: Vec<usize> = fits.iter().map(|f| f.report.window_size).collect();
        assert_eq!(windows, schedule.window_sizes);
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let (x, y) = series();
        let config = WeaselConfig::default();
        let schedule = schedule_windows(24, 6, 100, 2).unwrap();

        let serial_pool = build_pool(1).unwrap();
        let parallel_pool = build_pool(3).unwrap();

        let serial = fit_windows(&serial_pool, x.view(), &y, &schedule, &config).unwrap();
        let parallel = fit_windows(&parallel_pool, x.view(), &y, &schedule, &config).unwrap();
        for (a, b) in serial.iter().zip(&parallel) {
            assert_eq!(a.report, b.report);
            assert_eq!(a.bags, b.bags);
        }
    }

    #[test]
    fn test_first_failure_aborts() {
        let (x, _) = series();
        let y = vec![1; 8];
        let schedule = schedule_windows(24, 6, 100, 2).unwrap();
        let pool = build_pool(2).unwrap();
        let config = WeaselConfig::default();
        let err = fit_windows(&pool, x.view(), &y, &schedule, &config).unwrap_err();
        assert!(err.window_size().is_some());
    }
}
