// SPDX-License-Identifier: LGPL-3.0-or-later

//! Application of fractional-delay taps to sampled channel data.
//!
//! The correction is a valid-mode convolution: only output positions
//! where the filter fully overlaps acquired data are produced. The filter
//! combines the newest sample with the `order - 1` before it and never a
//! future one, so output `j` belongs to the virtual-clock instant of
//! input `j + order - 1`. That latency is carried by [`CorrectedSamples`]
//! instead of being hidden from the caller.

use fracdelay_lib::convolution::{convolve_valid, valid_len};
use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::interpolation::{lagrange_taps, latency};

/// Delay-corrected samples together with their alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedSamples {
    samples: Vec<f64>,
    latency: usize,
}

impl CorrectedSamples {
    /// The corrected values.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consume and return the corrected values.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Pipeline latency in samples (`order - 1`).
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Number of corrected samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples were produced.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the input sample whose virtual-clock instant output `j`
    /// is aligned to.
    pub fn source_index(&self, j: usize) -> usize {
        j + self.latency
    }

    /// Virtual-clock timestamp of every output, given the nominal instant
    /// `t0` of input sample 0 and the sample `period`.
    ///
    /// # Examples
    /// ```
    /// use fracdelay_units::corrector::apply;
    ///
    /// let out = apply(&[0.5, 0.5], &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(out.timestamps(10.0, 2.0), vec![12.0, 14.0]);
    /// ```
    pub fn timestamps(&self, t0: f64, period: f64) -> Vec<f64> {
        (0..self.samples.len())
            .map(|j| t0 + self.source_index(j) as f64 * period)
            .collect()
    }
}

/// Correct one channel's samples with `taps`.
///
/// `samples` are the channel's values in acquisition order, one per
/// sampling period, each taken at its group's delayed instant. Produces
/// `samples.len() - taps.len() + 1` outputs.
///
/// # Errors
/// - [`Error::InvalidOrder`] if `taps` is empty
/// - [`Error::InsufficientSamples`] if `samples` is shorter than `taps`
pub fn apply(taps: &[f64], samples: &[f64]) -> Result<CorrectedSamples> {
    let order = taps.len();
    if order < 1 {
        return Err(Error::InvalidOrder { order });
    }
    if samples.len() < order {
        return Err(Error::InsufficientSamples {
            needed: order,
            got: samples.len(),
        });
    }

    let mut out = vec![0.0; valid_len(samples.len(), order)];
    convolve_valid(&mut out, samples, taps);

    Ok(CorrectedSamples {
        samples: out,
        latency: latency(order),
    })
}

/// A channel's correction filter.
///
/// # Examples
/// ```
/// use fracdelay_units::corrector::DelayCorrector;
///
/// let corrector = DelayCorrector::new(4, 0.25).unwrap();
/// assert_eq!(corrector.latency(), 3);
///
/// // Constant input stays constant
/// let out = corrector.apply(&[2.0; 8]).unwrap();
/// assert!(out.samples().iter().all(|&x| (x - 2.0).abs() < 1e-12));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DelayCorrector {
    delay: f64,
    taps: Vec<f64>,
}

impl DelayCorrector {
    /// Synthesize an `order`-tap Lagrange corrector for `delay` samples.
    pub fn new(order: usize, delay: f64) -> Result<Self> {
        let taps = lagrange_taps(order, delay)?;
        Ok(Self { delay, taps })
    }

    /// Delay in samples this corrector compensates.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Filter coefficients.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of taps.
    pub fn order(&self) -> usize {
        self.taps.len()
    }

    /// Pipeline latency in samples.
    pub fn latency(&self) -> usize {
        latency(self.taps.len())
    }

    /// Correct a block of this channel's samples.
    pub fn apply(&self, samples: &[f64]) -> Result<CorrectedSamples> {
        apply(&self.taps, samples)
    }
}

/// Correct every channel with its own corrector.
///
/// Channels are independent and processed in parallel; the result keeps
/// channel order. All inputs are checked before anything is computed.
///
/// # Errors
/// - [`Error::ChannelCountMismatch`] if the slices differ in length
/// - [`Error::InsufficientSamples`] for the first channel that is too short
pub fn correct_channels(
    correctors: &[DelayCorrector],
    channels: &[Vec<f64>],
) -> Result<Vec<CorrectedSamples>> {
    if correctors.len() != channels.len() {
        return Err(Error::ChannelCountMismatch {
            expected: correctors.len(),
            got: channels.len(),
        });
    }
    if let Some((c, data)) = correctors
        .iter()
        .zip(channels)
        .find(|(c, data)| data.len() < c.order())
    {
        return Err(Error::InsufficientSamples {
            needed: c.order(),
            got: data.len(),
        });
    }

    debug!("correcting {} channels", channels.len());

    correctors
        .par_iter()
        .zip(channels.par_iter())
        .enumerate()
        .map(|(i, (c, data))| {
            trace!(
                "channel {}: {} samples, delay {:.4} samples, {} taps",
                i,
                data.len(),
                c.delay(),
                c.order()
            );
            c.apply(data)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn output_is_shorter_by_latency() {
        let out = apply(&[0.2, 0.3, 0.5], &[1.0; 10]).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(out.latency(), 2);
        assert_eq!(out.source_index(0), 2);
    }

    #[test]
    fn exact_length_yields_one_sample() {
        let out = apply(&[1.0, 0.0, 0.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(out.samples(), &[6.0]);
    }

    #[test]
    fn too_few_samples_rejected() {
        let err = apply(&[0.25; 4], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, Error::InsufficientSamples { needed: 4, got: 3 });
    }

    #[test]
    fn empty_taps_rejected() {
        assert_eq!(
            apply(&[], &[1.0]).unwrap_err(),
            Error::InvalidOrder { order: 0 }
        );
    }

    #[test]
    fn zero_delay_passes_newest_samples() {
        let samples = [0.5, -1.0, 2.0, 3.5, -0.25];
        let c = DelayCorrector::new(3, 0.0).unwrap();
        let out = c.apply(&samples).unwrap();
        assert_eq!(out.samples(), &samples[2..]);
    }

    #[test]
    fn ramp_is_shifted_exactly() {
        // Linear data is reproduced exactly by any filter with >= 2 taps
        let samples: Vec<f64> = (0..12).map(|n| 3.0 * n as f64 + 1.0).collect();
        let delay = 0.37;
        let out = DelayCorrector::new(4, delay).unwrap().apply(&samples).unwrap();
        for (j, &y) in out.samples().iter().enumerate() {
            let expected = 3.0 * (out.source_index(j) as f64 - delay) + 1.0;
            assert!((y - expected).abs() < 1e-10, "output {j}: {y} vs {expected}");
        }
    }

    #[test]
    fn late_sampled_tone_moves_to_virtual_clock() {
        // Channel sampled 0.3 periods late; corrected values should match
        // the tone at the nominal instants.
        let w = 2.0 * PI / 40.0;
        let delay = 0.3;
        let samples: Vec<f64> = (0..64).map(|n| (w * (n as f64 + delay)).sin()).collect();
        let out = DelayCorrector::new(6, delay).unwrap().apply(&samples).unwrap();
        for (j, &y) in out.samples().iter().enumerate() {
            let ideal = (w * out.source_index(j) as f64).sin();
            assert!((y - ideal).abs() < 1e-5, "output {j}: {y} vs {ideal}");
        }
    }

    #[test]
    fn correct_channels_keeps_order() {
        let correctors = vec![
            DelayCorrector::new(2, 0.0).unwrap(),
            DelayCorrector::new(2, 1.0).unwrap(),
        ];
        let channels = vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]];
        let out = correct_channels(&correctors, &channels).unwrap();
        assert_eq!(out[0].samples(), &[2.0, 3.0]);
        assert_eq!(out[1].samples(), &[10.0, 20.0]);
    }

    #[test]
    fn correct_channels_validates_before_computing() {
        let correctors = vec![DelayCorrector::new(3, 0.5).unwrap(); 2];
        assert_eq!(
            correct_channels(&correctors, &[vec![0.0; 8]]).unwrap_err(),
            Error::ChannelCountMismatch {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            correct_channels(&correctors, &[vec![0.0; 8], vec![0.0; 2]]).unwrap_err(),
            Error::InsufficientSamples { needed: 3, got: 2 }
        );
    }
}
