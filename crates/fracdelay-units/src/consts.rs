// SPDX-License-Identifier: LGPL-3.0-or-later

//! Default converter timing and analysis constants.
//!
//! These are the values of the reference board the analysis was written
//! for; everything here can be overridden through
//! [`DesignConfig`](crate::DesignConfig).

// Converter timing

/// Converter clock frequency (Hz)
pub const ADC_CLOCK_HZ: f64 = 50e6;

/// Acquisition (sample-and-hold) time in converter clock cycles
pub const ADC_SAMPLE_HOLD_CYCLES: f64 = 16.5;

/// Conversion time after acquisition (s). Unknown for the reference
/// board, so it defaults to zero.
pub const ADC_CONVERSION_TIME: f64 = 0.0;

// Channel layout

/// Number of multiplexed channels
pub const NUM_CHANNELS: usize = 20;

/// Channel ids of each sampling group, in acquisition order
pub const CHANNEL_GROUPS: [&[usize]; 8] = [
    &[8, 9, 0],
    &[10, 12, 1],
    &[11, 13, 2],
    &[14, 15, 3],
    &[16, 17, 4],
    &[18, 5],
    &[19, 6],
    &[7],
];

// Analysis

/// Rate of the signal the correction filters run at (Hz)
pub const SAMPLE_RATE_HZ: f64 = 40e3;

/// Rate at which corrected values are typically reported (Hz)
pub const REPORTING_RATE_HZ: f64 = 1e3;

/// Filter lengths (tap counts) compared by default
pub const FILTER_ORDERS: [usize; 3] = [3, 4, 6];

/// Points in the verification sweep
pub const SWEEP_POINTS: usize = 1000;

/// Lowest sweep frequency as a fraction of the sample rate
pub const SWEEP_LOWEST_FRACTION: f64 = 1e-4;

/// Test tone frequency as a fraction of the sample rate
pub const TONE_FRACTION: f64 = 1.0 / 8.0;

/// Number of virtual-clock instants the test tone is sampled at
pub const TONE_SAMPLES: usize = 9;

/// In-band magnitude error above which a design is reported (dB)
pub const MAGNITUDE_TOLERANCE_DB: f64 = 0.1;

/// Largest FFT rank accepted for dense responses (2^20 points)
pub const MAX_FFT_RANK: usize = 20;

/// Degrees per full phase turn
pub const DEG_PER_TURN: f64 = 360.0;
