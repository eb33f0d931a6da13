#![forbid(unsafe_code)]

//! Value codec: digit ↔ activation pattern, integer ↔ rod digits.
//!
//! One Heavy bead is worth 5, each of the four Light beads is worth 1, so a
//! digit `d` is encoded as `heavy = d >= 5`, `lights = d % 5`. Rods are
//! ordered most significant first.

use crate::bead::LIGHT_BEADS;
use crate::error::AbacusError;

/// Value contributed by an active Heavy bead.
pub const HEAVY_WEIGHT: u8 = 5;

/// Discrete state of one rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DigitPattern {
    /// Whether the Heavy bead is against the divider.
    pub heavy: bool,
    /// How many Light beads are against the divider (a prefix from slot 0).
    pub lights: u8,
}

impl DigitPattern {
    /// Encode a digit.
    pub fn from_digit(digit: u8) -> Result<Self, AbacusError> {
        if digit > 9 {
            return Err(AbacusError::DigitOutOfRange { digit });
        }
        Ok(Self {
            heavy: digit >= HEAVY_WEIGHT,
            lights: digit % HEAVY_WEIGHT,
        })
    }

    /// Decode back to a digit in `0..=9`.
    #[must_use]
    pub fn digit(self) -> u8 {
        debug_assert!(usize::from(self.lights) <= LIGHT_BEADS);
        u8::from(self.heavy) * HEAVY_WEIGHT + self.lights
    }
}

/// Largest value a frame with `rods` rods can show: `10^rods - 1`.
///
/// Saturates at `u128::MAX` for rod counts beyond what a `u128` can hold.
#[must_use]
pub fn capacity(rods: usize) -> u128 {
    u32::try_from(rods)
        .ok()
        .and_then(|r| 10u128.checked_pow(r))
        .map_or(u128::MAX, |p| p - 1)
}

/// Split `value` into `rods` decimal digits, zero-padded on the left.
pub fn split_value(value: u128, rods: usize) -> Result<Vec<u8>, AbacusError> {
    let max = capacity(rods);
    if value > max {
        return Err(AbacusError::ValueOutOfRange {
            value: signed(value),
            max,
        });
    }

    let mut digits = vec![0u8; rods];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = (rest % 10) as u8;
        rest /= 10;
    }
    Ok(digits)
}

/// Join digits (most significant first) into a value.
#[must_use]
pub fn join_digits(digits: &[u8]) -> u128 {
    digits
        .iter()
        .fold(0u128, |acc, &d| acc * 10 + u128::from(d))
}

/// Widen a total for signed arithmetic, saturating at `i128::MAX`.
#[must_use]
pub(crate) fn signed(value: u128) -> i128 {
    i128::try_from(value).unwrap_or(i128::MAX)
}
