// SPDX-License-Identifier: LGPL-3.0-or-later

//! Horizontal (reduction) operations over sample buffers.

/// Sum of all samples, using compensated (Kahan) summation.
///
/// Interpolation taps of high order alternate in sign with large
/// magnitudes, so plain summation loses the unit DC gain.
pub fn sum(src: &[f64]) -> f64 {
    let mut acc = 0.0;
    let mut comp = 0.0;
    for &x in src {
        let y = x - comp;
        let t = acc + y;
        comp = (t - acc) - y;
        acc = t;
    }
    acc
}

/// Maximum absolute element-wise difference over the common length.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0, |m, (&x, &y)| m.max((x - y).abs()))
}
