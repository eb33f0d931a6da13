#![forbid(unsafe_code)]

//! Recoverable errors for the bead model.
//!
//! Only caller-input failures live here. Contract breaches (unknown slot,
//! snapping with no gesture) panic instead.

use std::fmt;

use crate::config::ConfigError;

/// Errors returned by [`Abacus`](crate::Abacus) operations.
///
/// Every failing operation leaves the model exactly as it was.
#[derive(Debug)]
pub enum AbacusError {
    /// Requested total is negative or exceeds `10^rods - 1`.
    ValueOutOfRange { value: i128, max: u128 },
    /// Digit outside `0..=9`.
    DigitOutOfRange { digit: u8 },
    /// Rod index outside `0..rods`.
    RodOutOfRange { rod: usize, rods: usize },
    /// A drag gesture owns the bead state; bulk writes and new gestures wait.
    GestureInProgress,
    /// Configuration failed validation.
    InvalidConfig(ConfigError),
}

impl fmt::Display for AbacusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange { value, max } => {
                write!(f, "value {value} outside representable range 0..={max}")
            }
            Self::DigitOutOfRange { digit } => write!(f, "digit {digit} outside 0..=9"),
            Self::RodOutOfRange { rod, rods } => {
                write!(f, "rod {rod} out of range for a {rods}-rod frame")
            }
            Self::GestureInProgress => write!(f, "a drag gesture is in progress"),
            Self::InvalidConfig(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for AbacusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::InvalidConfig(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<ConfigError> for AbacusError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}
