// SPDX-License-Identifier: LGPL-3.0-or-later

//! Frequency-response verification of correction filters.
//!
//! A filter is evaluated on the unit circle at each requested frequency;
//! magnitude is reported in dB and phase in degrees, unwrapped so curves
//! from different filters can be compared or subtracted.
//!
//! Frequencies at or above Nyquist alias onto the band below it. The
//! default [`NyquistPolicy::Reject`] refuses them; [`NyquistPolicy::Alias`]
//! evaluates them anyway and returns the periodic (aliased) result.

use fracdelay_lib::complex::{complex_arg_deg, complex_mag_db, fir_response};
use fracdelay_lib::fft::fir_spectrum;
use fracdelay_lib::grid::logspace;
use fracdelay_lib::phase::unwrap_deg;
use serde::{Deserialize, Serialize};

use crate::consts::{DEG_PER_TURN, MAX_FFT_RANK};
use crate::error::{Error, Result, positive};
use crate::units::{delay_phase_deg, hz_to_omega};

/// How frequencies at or above Nyquist are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NyquistPolicy {
    /// Fail with [`Error::OutOfBandFrequency`].
    #[default]
    Reject,
    /// Evaluate anyway; results fold back into the base band.
    Alias,
}

/// Magnitude and unwrapped phase of a filter over a frequency grid.
///
/// All three sequences always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResponse {
    frequencies: Vec<f64>,
    magnitude_db: Vec<f64>,
    phase_deg: Vec<f64>,
}

impl FrequencyResponse {
    /// Evaluation frequencies in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Magnitude in dB at each frequency.
    pub fn magnitude_db(&self) -> &[f64] {
        &self.magnitude_db
    }

    /// Unwrapped phase in degrees at each frequency.
    pub fn phase_deg(&self) -> &[f64] {
        &self.phase_deg
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the response has no points.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterate over `(frequency, magnitude_db, phase_deg)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.frequencies
            .iter()
            .zip(&self.magnitude_db)
            .zip(&self.phase_deg)
            .map(|((&f, &m), &p)| (f, m, p))
    }

    /// Compare against an ideal pure delay of `delay` samples, over the
    /// points at or below `band_edge` Hz.
    pub fn summarize(&self, delay: f64, sample_rate: f64, band_edge: f64) -> ResponseSummary {
        let mut summary = ResponseSummary {
            band_edge,
            points: 0,
            max_magnitude_error_db: 0.0,
            max_phase_error_deg: 0.0,
        };

        for (f, mag, phase) in self.iter().filter(|&(f, _, _)| f <= band_edge) {
            let ideal = delay_phase_deg(sample_rate, f, delay);
            // Compare modulo a full turn so the unwrap anchor does not matter
            let half = DEG_PER_TURN * 0.5;
            let err = (phase - ideal + half).rem_euclid(DEG_PER_TURN) - half;
            summary.points += 1;
            summary.max_magnitude_error_db = summary.max_magnitude_error_db.max(mag.abs());
            summary.max_phase_error_deg = summary.max_phase_error_deg.max(err.abs());
        }

        summary
    }
}

/// Worst-case deviation of a filter from an ideal delay inside a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseSummary {
    /// Upper edge of the compared band in Hz.
    pub band_edge: f64,
    /// Number of sweep points inside the band.
    pub points: usize,
    /// Largest `|magnitude|` in dB (an ideal delay has 0 dB).
    pub max_magnitude_error_db: f64,
    /// Largest phase deviation from the ideal delay in degrees.
    pub max_phase_error_deg: f64,
}

impl ResponseSummary {
    /// Combine two summaries, keeping the worst errors.
    pub fn worst(self, other: Self) -> Self {
        Self {
            band_edge: self.band_edge.max(other.band_edge),
            points: self.points.max(other.points),
            max_magnitude_error_db: self.max_magnitude_error_db.max(other.max_magnitude_error_db),
            max_phase_error_deg: self.max_phase_error_deg.max(other.max_phase_error_deg),
        }
    }
}

fn check_band(frequencies: &[f64], nyquist: f64, policy: NyquistPolicy) -> Result<()> {
    let out_of_band = |f: f64| match policy {
        NyquistPolicy::Reject => !f.is_finite() || !(0.0..nyquist).contains(&f),
        NyquistPolicy::Alias => !f.is_finite(),
    };
    match frequencies.iter().copied().find(|&f| out_of_band(f)) {
        Some(frequency) => Err(Error::OutOfBandFrequency { frequency, nyquist }),
        None => Ok(()),
    }
}

fn from_complex(frequencies: Vec<f64>, re: &[f64], im: &[f64]) -> FrequencyResponse {
    let n = frequencies.len();
    let mut magnitude_db = vec![0.0; n];
    let mut phase_deg = vec![0.0; n];
    complex_mag_db(&mut magnitude_db, re, im);
    complex_arg_deg(&mut phase_deg, re, im);
    unwrap_deg(&mut phase_deg);
    FrequencyResponse {
        frequencies,
        magnitude_db,
        phase_deg,
    }
}

/// Evaluate the response of `taps` running at `sample_rate` at each of
/// `frequencies` (Hz).
///
/// # Errors
/// - [`Error::InvalidOrder`] if `taps` is empty
/// - [`Error::InvalidParameter`] if `sample_rate` is not positive
/// - [`Error::OutOfBandFrequency`] for the first frequency the policy
///   refuses
///
/// # Examples
/// ```
/// use fracdelay_units::interpolation::lagrange_taps;
/// use fracdelay_units::response::{NyquistPolicy, frequency_response};
///
/// let taps = lagrange_taps(4, 0.3).unwrap();
/// let resp = frequency_response(&taps, 40e3, &[0.0, 100.0, 1000.0], NyquistPolicy::Reject)
///     .unwrap();
/// assert!(resp.magnitude_db()[0].abs() < 1e-9); // unity gain at DC
/// assert!(frequency_response(&taps, 40e3, &[20e3], NyquistPolicy::Reject).is_err());
/// ```
pub fn frequency_response(
    taps: &[f64],
    sample_rate: f64,
    frequencies: &[f64],
    policy: NyquistPolicy,
) -> Result<FrequencyResponse> {
    if taps.is_empty() {
        return Err(Error::InvalidOrder { order: 0 });
    }
    positive("sample rate", sample_rate)?;
    check_band(frequencies, sample_rate * 0.5, policy)?;

    let omegas: Vec<f64> = frequencies
        .iter()
        .map(|&f| hz_to_omega(sample_rate, f))
        .collect();
    let mut re = vec![0.0; omegas.len()];
    let mut im = vec![0.0; omegas.len()];
    fir_response(&mut re, &mut im, taps, &omegas);

    Ok(from_complex(frequencies.to_vec(), &re, &im))
}

/// Log-spaced sweep from `lowest_fraction * sample_rate` up to, but not
/// including, Nyquist.
///
/// # Errors
/// [`Error::InvalidParameter`] unless `sample_rate > 0` and
/// `0 < lowest_fraction < 0.5`.
pub fn log_sweep(sample_rate: f64, lowest_fraction: f64, points: usize) -> Result<Vec<f64>> {
    positive("sample rate", sample_rate)?;
    if !(lowest_fraction > 0.0 && lowest_fraction < 0.5) {
        return Err(Error::InvalidParameter {
            name: "lowest sweep fraction",
            value: lowest_fraction,
        });
    }
    let lo = (lowest_fraction * sample_rate).log10();
    let hi = (0.5 * sample_rate).log10();
    Ok(logspace(lo, hi, points, false))
}

/// Response on the uniform grid `k * sample_rate / 2^rank`,
/// `0 <= k < 2^(rank-1)`, computed with one FFT.
///
/// # Errors
/// - [`Error::InvalidOrder`] if `taps` is empty
/// - [`Error::InvalidParameter`] if `rank` is zero or above
///   [`MAX_FFT_RANK`], if `2^rank` is shorter than the filter, or if
///   `sample_rate` is not positive
pub fn dense_response(taps: &[f64], sample_rate: f64, rank: usize) -> Result<FrequencyResponse> {
    if taps.is_empty() {
        return Err(Error::InvalidOrder { order: 0 });
    }
    positive("sample rate", sample_rate)?;
    if rank == 0 || rank > MAX_FFT_RANK || taps.len() > (1usize << rank) {
        return Err(Error::InvalidParameter {
            name: "FFT rank",
            value: rank as f64,
        });
    }

    let n = 1usize << rank;
    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    fir_spectrum(&mut re, &mut im, taps, rank);

    let half = n / 2;
    let frequencies = (0..half)
        .map(|k| k as f64 * sample_rate / n as f64)
        .collect();
    Ok(from_complex(frequencies, &re[..half], &im[..half]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::lagrange_taps;
    use float_cmp::assert_approx_eq;

    const SR: f64 = 40e3;

    #[test]
    fn lengths_always_match() {
        let taps = lagrange_taps(3, 0.2).unwrap();
        let freqs = log_sweep(SR, 1e-4, 200).unwrap();
        let resp = frequency_response(&taps, SR, &freqs, NyquistPolicy::Reject).unwrap();
        assert_eq!(resp.len(), 200);
        assert_eq!(resp.magnitude_db().len(), 200);
        assert_eq!(resp.phase_deg().len(), 200);
        assert_eq!(resp.iter().count(), 200);
    }

    #[test]
    fn dc_is_unity_gain_zero_phase() {
        for order in 1..=7 {
            let taps = lagrange_taps(order, 0.61).unwrap();
            let resp = frequency_response(&taps, SR, &[0.0], NyquistPolicy::Reject).unwrap();
            assert!(resp.magnitude_db()[0].abs() < 1e-9, "order {order}");
            assert!(resp.phase_deg()[0].abs() < 1e-9, "order {order}");
        }
    }

    #[test]
    fn pure_integer_delay_has_linear_phase() {
        // Taps [0, 0, 1]: two-sample delay, flat magnitude, phase -2w
        let taps = lagrange_taps(3, 2.0).unwrap();
        let freqs = log_sweep(SR, 1e-3, 300).unwrap();
        let resp = frequency_response(&taps, SR, &freqs, NyquistPolicy::Reject).unwrap();
        for (f, mag, phase) in resp.iter() {
            assert!(mag.abs() < 1e-9);
            assert_approx_eq!(f64, phase, -720.0 * f / SR, epsilon = 1e-6);
        }
    }

    #[test]
    fn phase_is_unwrapped() {
        // A 5-sample delay turns through 900 degrees by Nyquist
        let taps = lagrange_taps(6, 5.0).unwrap();
        let freqs = log_sweep(SR, 1e-3, 500).unwrap();
        let resp = frequency_response(&taps, SR, &freqs, NyquistPolicy::Reject).unwrap();
        assert!(fracdelay_lib::phase::max_step(resp.phase_deg()) < 180.0);
        let last = *resp.phase_deg().last().unwrap();
        assert!(last < -800.0, "final phase {last}");
    }

    #[test]
    fn reject_policy_refuses_out_of_band() {
        let taps = [1.0];
        for &f in &[20e3, 25e3, -1.0, f64::NAN] {
            let err = frequency_response(&taps, SR, &[100.0, f], NyquistPolicy::Reject);
            assert!(
                matches!(err, Err(Error::OutOfBandFrequency { nyquist, .. }) if nyquist == 20e3),
                "frequency {f}"
            );
        }
    }

    #[test]
    fn alias_policy_folds() {
        // Above Nyquist, f and fs - f give conjugate responses
        let taps = lagrange_taps(4, 0.4).unwrap();
        let resp = frequency_response(&taps, SR, &[3e3, 37e3], NyquistPolicy::Alias).unwrap();
        assert_approx_eq!(
            f64,
            resp.magnitude_db()[0],
            resp.magnitude_db()[1],
            epsilon = 1e-9
        );
        assert!(frequency_response(&taps, SR, &[f64::INFINITY], NyquistPolicy::Alias).is_err());
    }

    #[test]
    fn empty_taps_and_bad_rate_rejected() {
        assert_eq!(
            frequency_response(&[], SR, &[1.0], NyquistPolicy::Reject),
            Err(Error::InvalidOrder { order: 0 })
        );
        assert!(frequency_response(&[1.0], 0.0, &[1.0], NyquistPolicy::Reject).is_err());
    }

    #[test]
    fn log_sweep_spans_band() {
        let f = log_sweep(SR, 1e-4, 1000).unwrap();
        assert_eq!(f.len(), 1000);
        assert_approx_eq!(f64, f[0], 4.0, epsilon = 1e-9);
        assert!(*f.last().unwrap() < SR / 2.0);
        assert!(log_sweep(SR, 0.5, 10).is_err());
        assert!(log_sweep(SR, 0.0, 10).is_err());
    }

    #[test]
    fn dense_matches_pointwise() {
        let taps = lagrange_taps(6, 0.0924).unwrap();
        let dense = dense_response(&taps, SR, 8).unwrap();
        assert_eq!(dense.len(), 128);
        let direct =
            frequency_response(&taps, SR, dense.frequencies(), NyquistPolicy::Reject).unwrap();
        for i in 0..dense.len() {
            assert_approx_eq!(
                f64,
                dense.magnitude_db()[i],
                direct.magnitude_db()[i],
                epsilon = 1e-9
            );
            assert_approx_eq!(
                f64,
                dense.phase_deg()[i],
                direct.phase_deg()[i],
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn dense_rank_checked() {
        assert!(dense_response(&[1.0], SR, 0).is_err());
        assert!(dense_response(&[0.25; 5], SR, 2).is_err());
    }

    #[test]
    fn dense_rank_capped() {
        assert!(dense_response(&[1.0], SR, MAX_FFT_RANK).is_ok());
        for rank in [MAX_FFT_RANK + 1, 62, 64, usize::MAX] {
            assert_eq!(
                dense_response(&[1.0], SR, rank),
                Err(Error::InvalidParameter {
                    name: "FFT rank",
                    value: rank as f64
                })
            );
        }
    }

    #[test]
    fn summary_shrinks_with_order() {
        let d = 0.45;
        let freqs = log_sweep(SR, 1e-4, 1000).unwrap();
        let summarize = |order| {
            let taps = lagrange_taps(order, d).unwrap();
            frequency_response(&taps, SR, &freqs, NyquistPolicy::Reject)
                .unwrap()
                .summarize(d, SR, 1e3)
        };
        let s3 = summarize(3);
        let s6 = summarize(6);
        assert!(s3.points > 0 && s3.points == s6.points);
        assert!(s6.max_magnitude_error_db < s3.max_magnitude_error_db);
        assert!(s6.max_phase_error_deg < s3.max_phase_error_deg);
        assert!(s3.max_magnitude_error_db < 0.1);
    }

    #[test]
    fn summary_of_exact_delay_is_zero() {
        let taps = lagrange_taps(4, 1.0).unwrap();
        let freqs = log_sweep(SR, 1e-4, 100).unwrap();
        let s = frequency_response(&taps, SR, &freqs, NyquistPolicy::Reject)
            .unwrap()
            .summarize(1.0, SR, 1e3);
        assert!(s.max_magnitude_error_db < 1e-9);
        assert!(s.max_phase_error_deg < 1e-6);
    }
}
