// SPDX-License-Identifier: LGPL-3.0-or-later

//! # fracdelay-lib
//!
//! Low-level numeric kernels used by `fracdelay-units` to design and
//! verify per-channel fractional-delay FIR filters. It includes:
//!
//! - **Convolution**: valid-mode direct convolution
//! - **Complex evaluation**: FIR transfer function on the unit circle,
//!   magnitude in dB and phase in degrees
//! - **Phase**: unwrapping of periodic phase curves
//! - **Grids**: linearly and logarithmically spaced frequency grids
//! - **FFT**: dense FIR spectrum via `rustfft`
//! - **Math**: horizontal reductions over sample buffers
//!
//! ## Design
//!
//! Every kernel works on plain `f64` slices and never allocates unless it
//! returns a freshly built buffer. Validation of user input lives one
//! level up; these functions document their length contracts and
//! assert them. Hot loops use runtime SIMD dispatch via `multiversion`.

pub mod complex;
pub mod convolution;
pub mod fft;
pub mod grid;
pub mod math;
pub mod phase;
