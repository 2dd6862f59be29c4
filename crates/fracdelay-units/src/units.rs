// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.
//!
//! Converts between seconds, samples and normalized angular frequency.

use std::f64::consts::PI;

/// Convert a time in seconds to (fractional) samples at rate `sr`.
///
/// # Examples
/// ```
/// use fracdelay_units::units::seconds_to_samples;
///
/// assert!((seconds_to_samples(40e3, 25e-6) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn seconds_to_samples(sr: f64, time: f64) -> f64 {
    time * sr
}

/// Sample period in seconds.
#[inline]
pub fn sample_period(sr: f64) -> f64 {
    1.0 / sr
}

/// Convert a frequency in Hz to normalized angular frequency in radians
/// per sample.
#[inline]
pub fn hz_to_omega(sr: f64, freq: f64) -> f64 {
    2.0 * PI * freq / sr
}

/// Phase of a pure delay of `delay` samples at `freq` Hz, in degrees.
#[inline]
pub fn delay_phase_deg(sr: f64, freq: f64, delay: f64) -> f64 {
    -360.0 * freq * delay / sr
}
