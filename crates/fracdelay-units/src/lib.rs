// SPDX-License-Identifier: LGPL-3.0-or-later

//! # fracdelay-units
//!
//! Per-channel fractional-delay correction for multiplexed
//! analog-to-digital converters, built on top of [`fracdelay_lib`].
//!
//! A multiplexed converter acquires its channels group by group, so the
//! channels of group `k` are sampled `k * group_delay` after group 0.
//! This crate synthesizes, for every channel, a Lagrange interpolation
//! FIR filter that moves its samples back onto a common virtual clock,
//! and verifies each filter's frequency response. It includes:
//!
//! - **Timing**: channel→group schedule and per-channel delays
//! - **Interpolation**: Lagrange fractional-delay taps
//! - **Corrector**: valid-mode application of the taps to sampled data
//! - **Response**: magnitude/phase sweeps and in-band error summaries
//! - **Design**: the whole per-order pipeline driven by a [`DesignConfig`]
//!
//! ## Example
//!
//! ```
//! use fracdelay_units::timing::channel_delays;
//! use fracdelay_units::interpolation::lagrange_taps;
//! use fracdelay_units::corrector::apply;
//!
//! // Two groups, one sample period apart
//! let delays = channel_delays(&[vec![0], vec![1]], 1.0).unwrap();
//! let taps = lagrange_taps(3, delays[1]).unwrap();
//! assert_eq!(taps, vec![0.0, 1.0, 0.0]);
//!
//! let corrected = apply(&taps, &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(corrected.samples(), &[2.0, 3.0]);
//! assert_eq!(corrected.latency(), 2);
//! ```

pub mod consts;
pub mod corrector;
pub mod design;
pub mod error;
pub mod interpolation;
pub mod response;
pub mod timing;
pub mod units;

pub use design::DesignConfig;
pub use error::{Error, Result};
