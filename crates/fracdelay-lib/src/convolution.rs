// SPDX-License-Identifier: LGPL-3.0-or-later

//! Valid-mode FIR convolution.
//!
//! Kernels here are short (a handful of interpolation taps), so the
//! O(N*M) direct form is always used.

use multiversion::multiversion;

/// Number of outputs produced by a valid-mode convolution.
///
/// Returns zero when the kernel is empty or longer than the signal.
#[inline]
pub fn valid_len(src_len: usize, kernel_len: usize) -> usize {
    if kernel_len == 0 || src_len < kernel_len {
        0
    } else {
        src_len - kernel_len + 1
    }
}

/// Valid-mode convolution: only the positions where `kernel` fully
/// overlaps `src`.
///
/// `dst[j] = sum_k kernel[k] * src[j + M - 1 - k]` with `M = kernel.len()`,
/// so `kernel[0]` weights the newest sample of each window. At most
/// [`valid_len`] samples are written; any tail of `dst` beyond that is
/// zeroed.
///
/// # Examples
/// ```
/// use fracdelay_lib::convolution::convolve_valid;
///
/// let signal = [1.0, 2.0, 3.0, 4.0];
/// let mut output = [0.0; 3];
/// convolve_valid(&mut output, &signal, &[0.5, 0.5]);
/// assert_eq!(output, [1.5, 2.5, 3.5]);
/// ```
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn convolve_valid(dst: &mut [f64], src: &[f64], kernel: &[f64]) {
    let n = valid_len(src.len(), kernel.len());
    let out_len = dst.len().min(n);
    let last = kernel.len().saturating_sub(1);

    for (j, out) in dst[..out_len].iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &h) in kernel.iter().enumerate() {
            acc += h * src[j + last - k];
        }
        *out = acc;
    }
    dst[out_len..].fill(0.0);
}
