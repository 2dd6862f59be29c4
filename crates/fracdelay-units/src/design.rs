// SPDX-License-Identifier: LGPL-3.0-or-later

//! Per-order design pipeline.
//!
//! For each requested filter order, every channel gets its delay from
//! the group schedule, a Lagrange corrector for that delay, and a
//! verification sweep summarized against the ideal delay up to the
//! reporting rate. Orders and channels are independent and are computed
//! in parallel; results keep their input order.

use std::f64::consts::PI;

use fracdelay_lib::math::{max_abs_diff, sum};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CHANNEL_GROUPS, FILTER_ORDERS, MAGNITUDE_TOLERANCE_DB, REPORTING_RATE_HZ,
    SAMPLE_RATE_HZ, SWEEP_LOWEST_FRACTION, SWEEP_POINTS, TONE_FRACTION, TONE_SAMPLES,
};
use crate::corrector::DelayCorrector;
use crate::error::{Error, Result, non_negative, positive};
use crate::interpolation::latency;
use crate::response::{
    FrequencyResponse, NyquistPolicy, ResponseSummary, frequency_response, log_sweep,
};
use crate::timing::{ConverterTiming, GroupSchedule};
use crate::units::{sample_period, seconds_to_samples};

/// Everything the design pipeline reads.
///
/// `Default` reproduces the reference board: 20 channels in 8 groups, a
/// 50 MHz converter with 16.5 hold cycles, correction at 40 kHz and
/// filters of 3, 4 and 6 taps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Converter timing, from which the group delay is derived.
    pub timing: ConverterTiming,
    /// Number of channels; every channel must be in exactly one group.
    /// When omitted it is the number of entries in `groups`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_channels: Option<usize>,
    /// Channel ids of each sampling group, in acquisition order.
    pub groups: Vec<Vec<usize>>,
    /// Rate of the signal the correction filters run at (Hz).
    pub sample_rate: f64,
    /// Reporting rate (Hz); upper edge of the band the filters must be
    /// faithful in.
    pub reporting_rate: f64,
    /// Filter lengths (tap counts) to design.
    pub orders: Vec<usize>,
    /// Points in the verification sweep.
    pub sweep_points: usize,
    /// Lowest sweep frequency as a fraction of `sample_rate`.
    pub sweep_lowest_fraction: f64,
    /// Treatment of sweep frequencies at or above Nyquist.
    pub nyquist_policy: NyquistPolicy,
    /// Test tone frequency for [`tone_check`] (Hz).
    pub tone_frequency: f64,
    /// Number of virtual-clock instants the test tone is sampled at.
    pub tone_samples: usize,
    /// In-band magnitude error above which a design is reported (dB).
    pub magnitude_tolerance_db: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            timing: ConverterTiming::default(),
            num_channels: None,
            groups: CHANNEL_GROUPS.iter().map(|g| g.to_vec()).collect(),
            sample_rate: SAMPLE_RATE_HZ,
            reporting_rate: REPORTING_RATE_HZ,
            orders: FILTER_ORDERS.to_vec(),
            sweep_points: SWEEP_POINTS,
            sweep_lowest_fraction: SWEEP_LOWEST_FRACTION,
            nyquist_policy: NyquistPolicy::default(),
            tone_frequency: SAMPLE_RATE_HZ * TONE_FRACTION,
            tone_samples: TONE_SAMPLES,
            magnitude_tolerance_db: MAGNITUDE_TOLERANCE_DB,
        }
    }
}

impl DesignConfig {
    /// Check every parameter; the first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        self.validate_shared()?;
        if let Some(&order) = self.orders.iter().find(|&&o| o < 1) {
            return Err(Error::InvalidOrder { order });
        }
        Ok(())
    }

    // Everything except the order list, which single-order runs ignore
    fn validate_shared(&self) -> Result<()> {
        self.schedule()?;
        self.group_delay()?;
        positive("sample rate", self.sample_rate)?;
        positive("reporting rate", self.reporting_rate)?;
        non_negative("tone frequency", self.tone_frequency)?;
        non_negative("magnitude tolerance", self.magnitude_tolerance_db)?;
        self.sweep()?;
        Ok(())
    }

    /// Configured channel count, or the size of the group table.
    pub fn num_channels(&self) -> usize {
        self.num_channels
            .unwrap_or_else(|| self.groups.iter().map(Vec::len).sum())
    }

    /// The validated group schedule.
    pub fn schedule(&self) -> Result<GroupSchedule> {
        GroupSchedule::new(self.num_channels(), self.groups.clone())
    }

    /// Time between consecutive groups in seconds.
    pub fn group_delay(&self) -> Result<f64> {
        self.timing.group_delay()
    }

    /// Sample period of the corrected signal in seconds.
    pub fn sample_period(&self) -> f64 {
        sample_period(self.sample_rate)
    }

    /// The verification sweep frequencies.
    pub fn sweep(&self) -> Result<Vec<f64>> {
        log_sweep(self.sample_rate, self.sweep_lowest_fraction, self.sweep_points)
    }
}

/// One channel's correction filter and its verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDesign {
    pub channel: usize,
    pub group: usize,
    /// Sampling delay relative to group 0 (s).
    pub delay_seconds: f64,
    /// The same delay in samples of the corrected signal.
    pub delay_samples: f64,
    pub taps: Vec<f64>,
    /// Sum of the taps; 1 up to rounding.
    pub dc_gain: f64,
    pub response: FrequencyResponse,
    pub summary: ResponseSummary,
}

/// All channels' designs for one filter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDesign {
    /// Number of taps.
    pub order: usize,
    /// Pipeline latency in samples.
    pub latency: usize,
    pub channels: Vec<ChannelDesign>,
}

impl OrderDesign {
    /// Design for `channel`, if it exists.
    pub fn channel(&self, channel: usize) -> Option<&ChannelDesign> {
        self.channels.iter().find(|c| c.channel == channel)
    }

    /// Worst in-band errors over all channels.
    pub fn worst_summary(&self) -> Option<ResponseSummary> {
        self.channels
            .iter()
            .map(|c| c.summary)
            .reduce(ResponseSummary::worst)
    }
}

fn design_channels(
    config: &DesignConfig,
    schedule: &GroupSchedule,
    group_delay: f64,
    sweep: &[f64],
    order: usize,
) -> Result<OrderDesign> {
    let delays = schedule.channel_delays(group_delay)?;

    let channels = delays
        .par_iter()
        .enumerate()
        .map(|(channel, &delay_seconds)| {
            let delay_samples = seconds_to_samples(config.sample_rate, delay_seconds);
            let taps = DelayCorrector::new(order, delay_samples)?.taps().to_vec();
            let response =
                frequency_response(&taps, config.sample_rate, sweep, config.nyquist_policy)?;
            let summary =
                response.summarize(delay_samples, config.sample_rate, config.reporting_rate);
            Ok(ChannelDesign {
                channel,
                group: schedule.group_of(channel).unwrap_or_default(),
                delay_seconds,
                delay_samples,
                dc_gain: sum(&taps),
                taps,
                response,
                summary,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let design = OrderDesign {
        order,
        latency: latency(order),
        channels,
    };

    if let Some(worst) = design.worst_summary() {
        debug!(
            "order {}: worst in-band error {:.3e} dB, {:.3e} deg up to {} Hz",
            order, worst.max_magnitude_error_db, worst.max_phase_error_deg, worst.band_edge
        );
        if worst.max_magnitude_error_db > config.magnitude_tolerance_db {
            warn!(
                "order {}: in-band magnitude error {:.3} dB exceeds tolerance {:.3} dB",
                order, worst.max_magnitude_error_db, config.magnitude_tolerance_db
            );
        }
    }

    Ok(design)
}

/// Design every channel's corrector for one filter order.
///
/// # Errors
/// Any configuration error from [`DesignConfig::validate`], or
/// [`Error::InvalidOrder`] if `order` is zero.
///
/// # Examples
/// ```
/// use fracdelay_units::DesignConfig;
/// use fracdelay_units::design::design_order;
///
/// let config = DesignConfig {
///     sweep_points: 50,
///     ..DesignConfig::default()
/// };
/// let design = design_order(&config, 4).unwrap();
/// assert_eq!(design.channels.len(), 20);
/// assert_eq!(design.latency, 3);
/// ```
pub fn design_order(config: &DesignConfig, order: usize) -> Result<OrderDesign> {
    config.validate_shared()?;
    if order < 1 {
        return Err(Error::InvalidOrder { order });
    }
    let schedule = config.schedule()?;
    let group_delay = config.group_delay()?;
    let sweep = config.sweep()?;
    design_channels(config, &schedule, group_delay, &sweep, order)
}

/// Design every order listed in the configuration.
pub fn design(config: &DesignConfig) -> Result<Vec<OrderDesign>> {
    config.validate()?;
    let schedule = config.schedule()?;
    let group_delay = config.group_delay()?;
    let sweep = config.sweep()?;

    info!(
        "designing {} orders for {} channels, group delay {:.3e} s",
        config.orders.len(),
        schedule.num_channels(),
        group_delay
    );

    config
        .orders
        .par_iter()
        .map(|&order| design_channels(config, &schedule, group_delay, &sweep, order))
        .collect()
}

/// Time-domain check of one group's corrector on a test tone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneCheck {
    pub group: usize,
    /// Channels sampled by this group.
    pub channels: Vec<usize>,
    /// Group delay in samples.
    pub delay_samples: f64,
    /// Instants at which the group actually sampled the tone (s).
    pub sample_times: Vec<f64>,
    /// Tone values the group acquired.
    pub raw: Vec<f64>,
    /// Virtual-clock instants of the corrected values (s).
    pub timestamps: Vec<f64>,
    /// Corrected values.
    pub corrected: Vec<f64>,
    /// Tone values at `timestamps`.
    pub ideal: Vec<f64>,
    /// Largest `|corrected - ideal|`.
    pub max_error: f64,
    /// Largest error when the raw samples are used without correction.
    pub uncorrected_error: f64,
}

/// Sample a tone at each group's delayed instants, correct it with an
/// `order`-tap filter and compare with the tone on the virtual clock.
///
/// # Errors
/// Any configuration error, or [`Error::InsufficientSamples`] if
/// `tone_samples < order`.
pub fn tone_check(config: &DesignConfig, order: usize) -> Result<Vec<ToneCheck>> {
    config.validate_shared()?;
    let schedule = config.schedule()?;
    let group_delay = config.group_delay()?;
    let period = config.sample_period();
    if order < 1 {
        return Err(Error::InvalidOrder { order });
    }
    if config.tone_samples < order {
        return Err(Error::InsufficientSamples {
            needed: order,
            got: config.tone_samples,
        });
    }

    let w = 2.0 * PI * config.tone_frequency;
    let tone = |t: f64| (w * t).sin();

    schedule
        .groups()
        .par_iter()
        .enumerate()
        .map(|(group, channels)| {
            let offset = group as f64 * group_delay;
            let delay_samples = seconds_to_samples(config.sample_rate, offset);
            let sample_times: Vec<f64> = (0..config.tone_samples)
                .map(|k| k as f64 * period + offset)
                .collect();
            let raw: Vec<f64> = sample_times.iter().map(|&t| tone(t)).collect();

            let corrected = DelayCorrector::new(order, delay_samples)?.apply(&raw)?;
            let timestamps = corrected.timestamps(0.0, period);
            let ideal: Vec<f64> = timestamps.iter().map(|&t| tone(t)).collect();

            let max_error = max_abs_diff(corrected.samples(), &ideal);
            let uncorrected_error =
                max_abs_diff(&raw[corrected.latency()..], &ideal);

            Ok(ToneCheck {
                group,
                channels: channels.clone(),
                delay_samples,
                sample_times,
                raw,
                timestamps,
                corrected: corrected.into_samples(),
                ideal,
                max_error,
                uncorrected_error,
            })
        })
        .collect()
}
