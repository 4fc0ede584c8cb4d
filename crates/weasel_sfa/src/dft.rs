//! Windowed discrete Fourier transform.

use std::f64::consts::PI;

/// Precomputed real DFT for a fixed window size.
///
/// Output values interleave the real and imaginary parts of consecutive
/// coefficients, starting at the DC coefficient, or at the first harmonic
/// when `norm` is set.
#[derive(Debug, Clone)]
pub(crate) struct WindowDft {
    window_size: usize,
    dft_length: usize,
    cos: Vec<f64>,
    sin: Vec<f64>,
}

impl WindowDft {
    pub(crate) fn new(window_size: usize, dft_length: usize, norm: bool) -> Self {
        let offset = usize::from(norm);
        let n_coeffs = dft_length.div_ceil(2);
        let mut cos = Vec::with_capacity(n_coeffs * window_size);
        let mut sin = Vec::with_capacity(n_coeffs * window_size);

        for k in offset..offset + n_coeffs {
            for t in 0..window_size {
                let angle = 2.0 * PI * (k * t) as f64 / window_size as f64;
                cos.push(angle.cos());
                sin.push(angle.sin());
            }
        }

        Self {
            window_size,
            dft_length,
            cos,
            sin,
        }
    }

    pub(crate) fn dft_length(&self) -> usize {
        self.dft_length
    }

    /// Transform one window into `out` (length `dft_length`).
    ///
    /// The window is scaled by `1 / (sqrt(w) * std)`; a flat window keeps
    /// unit scale so it maps onto the DC coefficient only.
    pub(crate) fn transform(&self, window: &[f64], out: &mut [f64]) {
        debug_assert_eq!(window.len(), self.window_size);
        debug_assert_eq!(out.len(), self.dft_length);

        let w = self.window_size as f64;
        let mean = window.iter().sum::<f64>() / w;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / w;
        let std = var.sqrt();
        let std = if std > f64::EPSILON { std } else { 1.0 };
        let scale = 1.0 / (w.sqrt() * std);

        for (i, value) in out.iter_mut().enumerate() {
            let row = (i / 2) * self.window_size;
            let basis = if i % 2 == 0 {
                &self.cos[row..row + self.window_size]
            } else {
                &self.sin[row..row + self.window_size]
            };
            let acc: f64 = window.iter().zip(basis).map(|(x, b)| x * b).sum();
            *value = if i % 2 == 0 { acc * scale } else { -acc * scale };
        }
    }

    /// DFT of every stride-1 window of `series`.
    ///
    /// Returns an empty vector when the series is shorter than the window.
    pub(crate) fn sliding(&self, series: &[f64]) -> Vec<Vec<f64>> {
        if series.len() < self.window_size {
            return Vec::new();
        }
        series
            .windows(self.window_size)
            .map(|window| {
                let mut out = vec![0.0; self.dft_length];
                self.transform(window, &mut out);
                out
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_constant_window_has_only_dc() {
        let dft = WindowDft::new(8, 6, false);
        let mut out = vec![0.0; 6];
        dft.transform(&[3.0; 8], &mut out);
        // DC = sum / sqrt(w) with unit std
        assert_close(out[0], 24.0 / 8.0_f64.sqrt());
        for &v in &out[1..] {
            assert_close(v, 0.0);
        }
    }

    #[test]
    fn test_norm_drops_dc() {
        let dft = WindowDft::new(8, 4, true);
        let mut out = vec![0.0; 4];
        dft.transform(&[3.0; 8], &mut out);
        for &v in &out {
            assert_close(v, 0.0);
        }
    }

    #[test]
    fn test_pure_cosine_lands_on_its_harmonic() {
        let w = 16;
        let window: Vec<f64> = (0..w)
            .map(|t| (2.0 * PI * 2.0 * t as f64 / w as f64).cos())
            .collect();
        let dft = WindowDft::new(w, 8, false);
        let mut out = vec![0.0; 8];
        dft.transform(&window, &mut out);

        // coefficient k = 2 -> real part at index 4
        assert!(out[4].abs() > 1.0);
        for (i, &v) in out.iter().enumerate() {
            if i != 4 {
                assert_close(v, 0.0);
            }
        }
    }

    #[test]
    fn test_scale_invariance() {
        let window: Vec<f64> = (0..10).map(|t| (t as f64 * 0.7).sin()).collect();
        let scaled: Vec<f64> = window.iter().map(|v| v * 5.0).collect();
        let dft = WindowDft::new(10, 6, true);
        let mut a = vec![0.0; 6];
        let mut b = vec![0.0; 6];
        dft.transform(&window, &mut a);
        dft.transform(&scaled, &mut b);
        for (x, y) in a.iter().zip(&b) {
            assert_close(*x, *y);
        }
    }

    #[test]
    fn test_sliding_window_count() {
        let dft = WindowDft::new(5, 4, false);
        let series: Vec<f64> = (0..12).map(f64::from).collect();
        assert_eq!(dft.sliding(&series).len(), 8);
        assert!(dft.sliding(&series[..4]).is_empty());
    }
}
