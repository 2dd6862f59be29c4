// SPDX-License-Identifier: LGPL-3.0-or-later

//! Lagrange fractional-delay interpolation.
//!
//! An `N`-tap Lagrange filter is the unique polynomial of degree `N - 1`
//! through `N` consecutive samples, evaluated at a fractional position.
//! Tap `k` is the `k`-th Lagrange basis polynomial over the nodes
//! `{0, 1, ..., N-1}`:
//!
//! ```text
//! taps[k] = prod_{m != k} (delay - m) / (k - m)
//! ```
//!
//! Applied by convolution, `taps[k]` weights the sample `k` periods
//! older than the newest one in the window, so the output estimates the
//! signal `delay` samples before the newest sample. The filter is
//! maximally flat at DC and its fixed pipeline latency is `N - 1`
//! samples.

use log::trace;

use crate::error::{Error, Result};

/// Evaluate the `k`-th Lagrange basis polynomial over the nodes
/// `{0, ..., order-1}` at `x`.
#[inline]
fn basis(order: usize, k: usize, x: f64) -> f64 {
    let kv = k as f64;
    (0..order)
        .filter(|&m| m != k)
        .fold(1.0, |acc, m| {
            let mv = m as f64;
            acc * (x - mv) / (kv - mv)
        })
}

/// Fill `dst` with the taps of a `dst.len()`-tap Lagrange fractional
/// delay filter.
///
/// # Errors
/// [`Error::InvalidOrder`] if `dst` is empty.
pub fn lagrange_taps_into(dst: &mut [f64], delay: f64) -> Result<()> {
    let order = dst.len();
    if order < 1 {
        return Err(Error::InvalidOrder { order });
    }
    for (k, tap) in dst.iter_mut().enumerate() {
        *tap = basis(order, k, delay);
    }
    Ok(())
}

/// Compute the taps of an `order`-tap Lagrange fractional-delay filter.
///
/// `delay` is in samples of the filter's own input rate. It may be
/// fractional, negative, or lie outside the tap span `[0, order-1]`; the
/// basis never divides by a quantity involving `delay`, so the result is
/// finite for any finite delay.
///
/// # Arguments
/// * `order` - Number of taps (filter length), at least 1
/// * `delay` - Desired shift in samples
///
/// # Returns
/// `order` coefficients; `taps[0]` applies to the newest sample.
///
/// # Errors
/// [`Error::InvalidOrder`] if `order` is zero.
///
/// # Examples
/// ```
/// use fracdelay_units::interpolation::lagrange_taps;
///
/// // Linear interpolation half way between two samples
/// assert_eq!(lagrange_taps(2, 0.5).unwrap(), vec![0.5, 0.5]);
///
/// // An integer delay selects a single sample
/// assert_eq!(lagrange_taps(3, 1.0).unwrap(), vec![0.0, 1.0, 0.0]);
/// ```
pub fn lagrange_taps(order: usize, delay: f64) -> Result<Vec<f64>> {
    let mut taps = vec![0.0; order];
    lagrange_taps_into(&mut taps, delay)?;
    trace!("lagrange taps: order={order} delay={delay} taps={taps:?}");
    Ok(taps)
}

/// Evaluate the polynomial through `(m, values[m])`, `m = 0..values.len()`,
/// at position `x`.
///
/// This is the same interpolation the taps perform, written as a direct
/// evaluation: `lagrange_eval(values, d) == sum_k taps(d)[k] * values[k]`.
///
/// # Errors
/// [`Error::InvalidOrder`] if `values` is empty.
///
/// # Examples
/// ```
/// use fracdelay_units::interpolation::lagrange_eval;
///
/// // Parabola y = m^2 through three nodes, read back at 1.5
/// let y = lagrange_eval(&[0.0, 1.0, 4.0], 1.5).unwrap();
/// assert!((y - 2.25).abs() < 1e-12);
/// ```
pub fn lagrange_eval(values: &[f64], x: f64) -> Result<f64> {
    let order = values.len();
    if order < 1 {
        return Err(Error::InvalidOrder { order });
    }
    Ok(values
        .iter()
        .enumerate()
        .map(|(k, &y)| y * basis(order, k, x))
        .sum())
}

/// Fixed pipeline latency of an `order`-tap filter, in samples.
#[inline]
pub fn latency(order: usize) -> usize {
    order.saturating_sub(1)
}
