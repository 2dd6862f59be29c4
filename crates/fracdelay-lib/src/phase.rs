// SPDX-License-Identifier: LGPL-3.0-or-later

//! Phase unwrapping.
//!
//! A phase curve read back through `atan2` jumps by a full period every
//! time it crosses the branch cut. Unwrapping removes those jumps so the
//! curve is continuous and can be added to or subtracted from other
//! phase curves.

/// Unwrap a periodic sequence in place.
///
/// Every step between consecutive samples whose magnitude reaches half a
/// period is replaced by its equivalent in `[-period/2, period/2)`, and
/// the accumulated correction is carried to all following samples. A
/// step of exactly `+period/2` is kept positive.
///
/// # Arguments
/// * `buf` - Phase samples; rewritten with the unwrapped curve
/// * `period` - Period of the wrapped quantity (`360.0` for degrees,
///   `2*pi` for radians)
///
/// # Examples
/// ```
/// use fracdelay_lib::phase::unwrap;
///
/// let mut phase = [170.0, 179.0, -172.0, -160.0];
/// unwrap(&mut phase, 360.0);
/// assert_eq!(phase, [170.0, 179.0, 188.0, 200.0]);
/// ```
pub fn unwrap(buf: &mut [f64], period: f64) {
    let half = period * 0.5;
    let mut correction = 0.0;
    let Some(&first) = buf.first() else {
        return;
    };
    let mut prev = first;

    for value in buf.iter_mut().skip(1) {
        let raw = *value;
        let step = raw - prev;
        if step.abs() >= half {
            let mut wrapped = (step + half).rem_euclid(period) - half;
            if wrapped == -half && step > 0.0 {
                wrapped = half;
            }
            correction += wrapped - step;
        }
        prev = raw;
        *value = raw + correction;
    }
}

/// Unwrap a phase curve given in degrees.
#[inline]
pub fn unwrap_deg(buf: &mut [f64]) {
    unwrap(buf, 360.0);
}

/// Largest absolute step between consecutive samples.
///
/// Returns zero for sequences shorter than two samples.
pub fn max_step(buf: &[f64]) -> f64 {
    buf.windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f64::max)
}
