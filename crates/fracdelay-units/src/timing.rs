// SPDX-License-Identifier: LGPL-3.0-or-later

//! Channel-group timing model.
//!
//! A multiplexed converter acquires its channels in groups; each group
//! starts as soon as the previous one has been acquired and converted.
//! Group `k` therefore samples `k * group_delay` after group 0, and every
//! channel inherits the delay of the group it belongs to.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::{ADC_CLOCK_HZ, ADC_CONVERSION_TIME, ADC_SAMPLE_HOLD_CYCLES};
use crate::error::{Error, Result, non_negative, positive};
use crate::units::seconds_to_samples;

/// Converter timing parameters from which the group delay is derived.
///
/// # Examples
/// ```
/// use fracdelay_units::timing::ConverterTiming;
///
/// let timing = ConverterTiming::default();
/// // 16.5 cycles at 50 MHz
/// assert!((timing.group_delay().unwrap() - 330e-9).abs() < 1e-18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterTiming {
    /// Converter clock frequency in Hz.
    pub clock_hz: f64,
    /// Acquisition (sample-and-hold) time in clock cycles.
    pub sample_hold_cycles: f64,
    /// Conversion time following acquisition, in seconds.
    pub conversion_time: f64,
}

impl Default for ConverterTiming {
    fn default() -> Self {
        Self {
            clock_hz: ADC_CLOCK_HZ,
            sample_hold_cycles: ADC_SAMPLE_HOLD_CYCLES,
            conversion_time: ADC_CONVERSION_TIME,
        }
    }
}

impl ConverterTiming {
    /// Acquisition time in seconds.
    pub fn sample_hold_time(&self) -> f64 {
        self.sample_hold_cycles / self.clock_hz
    }

    /// Time between the sampling instants of consecutive groups, in
    /// seconds: acquisition time plus conversion time.
    pub fn group_delay(&self) -> Result<f64> {
        positive("converter clock", self.clock_hz)?;
        non_negative("sample-and-hold cycles", self.sample_hold_cycles)?;
        non_negative("conversion time", self.conversion_time)?;
        Ok(self.sample_hold_time() + self.conversion_time)
    }
}

/// Validated partition of channels `[0, N)` into ordered sampling groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSchedule {
    groups: Vec<Vec<usize>>,
    group_of: Vec<usize>,
}

impl GroupSchedule {
    /// Build a schedule for `num_channels` channels.
    ///
    /// Every channel in `[0, num_channels)` must appear in exactly one
    /// group. Empty groups are allowed and still occupy a time slot.
    ///
    /// # Errors
    /// - [`Error::UnknownChannel`] if a group names a channel `>= num_channels`
    /// - [`Error::InvalidGroupAssignment`] if a channel is in zero or
    ///   several groups (the lowest such channel is reported)
    pub fn new(num_channels: usize, groups: Vec<Vec<usize>>) -> Result<Self> {
        let mut occurrences = vec![0usize; num_channels];
        let mut group_of = vec![0usize; num_channels];

        for (g, group) in groups.iter().enumerate() {
            for &channel in group {
                let Some(count) = occurrences.get_mut(channel) else {
                    return Err(Error::UnknownChannel {
                        channel,
                        num_channels,
                    });
                };
                *count += 1;
                group_of[channel] = g;
            }
        }

        if let Some((channel, &count)) = occurrences.iter().enumerate().find(|&(_, &n)| n != 1) {
            return Err(Error::InvalidGroupAssignment {
                channel,
                occurrences: count,
            });
        }

        debug!(
            "group schedule: {} channels in {} groups",
            num_channels,
            groups.len()
        );

        Ok(Self { groups, group_of })
    }

    /// Build a schedule whose channel count is the number of entries in
    /// the table.
    pub fn from_groups(groups: Vec<Vec<usize>>) -> Result<Self> {
        let num_channels = groups.iter().map(Vec::len).sum();
        Self::new(num_channels, groups)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.group_of.len()
    }

    /// Number of groups (time slots).
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// The group table in acquisition order.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Index of the group that samples `channel`.
    pub fn group_of(&self, channel: usize) -> Option<usize> {
        self.group_of.get(channel).copied()
    }

    /// Per-channel sampling delay in seconds relative to group 0:
    /// `delays[c] = group_of(c) * group_delay`.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `group_delay` is negative or not finite.
    pub fn channel_delays(&self, group_delay: f64) -> Result<Vec<f64>> {
        non_negative("group delay", group_delay)?;
        Ok(self
            .group_of
            .iter()
            .map(|&g| g as f64 * group_delay)
            .collect())
    }

    /// Per-channel delay in (fractional) samples of a signal at
    /// `sample_rate`.
    pub fn fractional_delays(&self, group_delay: f64, sample_rate: f64) -> Result<Vec<f64>> {
        positive("sample rate", sample_rate)?;
        let delays = self.channel_delays(group_delay)?;
        Ok(delays
            .into_iter()
            .map(|d| seconds_to_samples(sample_rate, d))
            .collect())
    }
}

/// Per-channel delays for a group table covering channels `[0, N)`,
/// where `N` is the number of entries in the table.
///
/// # Examples
/// ```
/// use fracdelay_units::timing::channel_delays;
///
/// let delays = channel_delays(&[vec![2, 0], vec![1]], 0.5).unwrap();
/// assert_eq!(delays, vec![0.0, 0.5, 0.0]);
/// ```
pub fn channel_delays(groups: &[Vec<usize>], group_delay: f64) -> Result<Vec<f64>> {
    GroupSchedule::from_groups(groups.to_vec())?.channel_delays(group_delay)
}
