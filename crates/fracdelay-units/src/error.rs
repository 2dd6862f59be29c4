// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error type shared by every design stage.
//!
//! All checks run before any output is built, so an `Err` never comes
//! with a partially computed array.

use thiserror::Error;

/// Errors raised while designing or applying fractional-delay filters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A channel is missing from the group table or listed more than once.
    #[error("channel {channel} appears in {occurrences} groups, expected exactly one")]
    InvalidGroupAssignment { channel: usize, occurrences: usize },

    /// The group table names a channel outside `[0, num_channels)`.
    #[error("group table names channel {channel}, but only {num_channels} channels exist")]
    UnknownChannel { channel: usize, num_channels: usize },

    /// A filter needs at least one tap.
    #[error("invalid filter order {order}: at least one tap is required")]
    InvalidOrder { order: usize },

    /// Fewer samples than taps were supplied.
    #[error("insufficient samples: filter needs at least {needed}, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    /// A frequency at or above Nyquist (or negative / non-finite) was
    /// requested under [`NyquistPolicy::Reject`](crate::response::NyquistPolicy).
    #[error("frequency {frequency} Hz is outside the band [0, {nyquist}) Hz")]
    OutOfBandFrequency { frequency: f64, nyquist: f64 },

    /// Per-channel inputs do not line up with the per-channel filters.
    #[error("expected data for {expected} channels, got {got}")]
    ChannelCountMismatch { expected: usize, got: usize },

    /// A physical or numeric parameter is out of its valid range.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject non-finite or negative values.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

/// Reject non-finite, zero or negative values.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let e = Error::InvalidGroupAssignment {
            channel: 7,
            occurrences: 2,
        };
        assert_eq!(
            e.to_string(),
            "channel 7 appears in 2 groups, expected exactly one"
        );

        let e = Error::InsufficientSamples { needed: 4, got: 3 };
        assert!(e.to_string().contains("needs at least 4, got 3"));
    }

    #[test]
    fn range_helpers() {
        assert_eq!(non_negative("x", 0.0), Ok(0.0));
        assert!(non_negative("x", -1e-12).is_err());
        assert!(non_negative("x", f64::NAN).is_err());
        assert_eq!(positive("x", 2.5), Ok(2.5));
        assert!(positive("x", 0.0).is_err());
        assert!(positive("x", f64::INFINITY).is_err());
    }
}
