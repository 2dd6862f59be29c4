// SPDX-License-Identifier: LGPL-3.0-or-later

//! FIR transfer-function evaluation on the unit circle.
//!
//! Responses are kept in the split real/imaginary (SOA) layout used by
//! the rest of the crate; `num-complex` is only used for the per-point
//! polynomial evaluation.

use multiversion::multiversion;
use num_complex::Complex64;

/// Evaluate `H(e^{jw}) = sum_k taps[k] * e^{-jwk}` at normalized angular
/// frequency `omega` (radians per sample).
///
/// Uses Horner's scheme in `z^-1`.
///
/// # Examples
/// ```
/// use fracdelay_lib::complex::fir_eval;
///
/// // A single unit tap is an all-pass with zero phase
/// let h = fir_eval(&[1.0], 1.3);
/// assert!((h.re - 1.0).abs() < 1e-12 && h.im.abs() < 1e-12);
/// ```
#[inline]
pub fn fir_eval(taps: &[f64], omega: f64) -> Complex64 {
    let z_inv = Complex64::from_polar(1.0, -omega);
    taps.iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &h| acc * z_inv + h)
}

/// Evaluate the FIR response at every angular frequency in `omegas`.
///
/// Writes `min(dst_re.len(), dst_im.len(), omegas.len())` points.
pub fn fir_response(dst_re: &mut [f64], dst_im: &mut [f64], taps: &[f64], omegas: &[f64]) {
    for ((re, im), &w) in dst_re.iter_mut().zip(dst_im.iter_mut()).zip(omegas) {
        let h = fir_eval(taps, w);
        *re = h.re;
        *im = h.im;
    }
}

/// Complex magnitude in decibels: `dst[i] = 20 * log10(|re + j*im|)`.
///
/// A zero magnitude maps to negative infinity.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn complex_mag_db(dst: &mut [f64], re: &[f64], im: &[f64]) {
    for i in 0..dst.len() {
        dst[i] = 10.0 * (re[i] * re[i] + im[i] * im[i]).log10();
    }
}

/// Complex argument in degrees, wrapped to `(-180, 180]`.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn complex_arg_deg(dst: &mut [f64], re: &[f64], im: &[f64]) {
    for i in 0..dst.len() {
        dst[i] = im[i].atan2(re[i]).to_degrees();
    }
}
