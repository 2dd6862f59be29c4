// SPDX-License-Identifier: LGPL-3.0-or-later

//! FFT operations using `rustfft` as the backend.
//!
//! Follows the split real/imaginary convention of the rest of the crate;
//! `rank` is log2 of the FFT size (e.g., rank=10 → 1024-point FFT).

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Zero-padded spectrum of a short FIR kernel.
///
/// Bin `k` holds `H(e^{j*2*pi*k/N})` with `N = 2^rank`, which is the same
/// quantity [`fir_eval`](crate::complex::fir_eval) computes point by
/// point, on a uniform grid.
///
/// # Panics
/// Panics if `taps.len() > 2^rank` or either destination is shorter than
/// `2^rank`.
///
/// # Examples
/// ```
/// use fracdelay_lib::fft::fir_spectrum;
///
/// let mut re = vec![0.0; 8];
/// let mut im = vec![0.0; 8];
/// fir_spectrum(&mut re, &mut im, &[0.5, 0.5], 3);
/// assert!((re[0] - 1.0).abs() < 1e-12); // DC gain
/// assert!(re[4].abs() < 1e-12 && im[4].abs() < 1e-12); // null at Nyquist
/// ```
pub fn fir_spectrum(dst_re: &mut [f64], dst_im: &mut [f64], taps: &[f64], rank: usize) {
    let n = 1usize << rank;
    assert!(
        taps.len() <= n,
        "kernel of {} taps does not fit a {}-point FFT",
        taps.len(),
        n
    );
    assert!(dst_re.len() >= n && dst_im.len() >= n);

    let mut buffer = vec![Complex64::new(0.0, 0.0); n];
    for (b, &h) in buffer.iter_mut().zip(taps) {
        b.re = h;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    for (i, c) in buffer.iter().enumerate() {
        dst_re[i] = c.re;
        dst_im[i] = c.im;
    }
}
