#![forbid(unsafe_code)]

//! Snap/discretization policy.
//!
//! Turns a rod's continuous offsets into a [`DigitPattern`] and rewrites every
//! bead to the canonical offset for that pattern.
//!
//! - **Heavy**: active iff its displacement from the divider is within
//!   `threshold_fraction · travel`.
//! - **Light**: the active count is the run of beads grouped at the divider
//!   end. Slot 0 joins if within the threshold; each later slot joins if it
//!   touches its predecessor (within `contact_tolerance`) or is itself within
//!   the threshold. The run stops at the first slot that does not join, so
//!   the result is always a prefix.
//!
//! Canonical offsets are a fixed function of the pattern, so snapping an
//! already snapped rod changes nothing.

use crate::bead::{LIGHT_BEADS, Role, Rod, TravelGeometry};
use crate::codec::DigitPattern;

/// Thresholds used when discretizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPolicy {
    pub threshold_fraction: f64,
    pub contact_tolerance: f64,
}

impl SnapPolicy {
    #[must_use]
    pub const fn new(threshold_fraction: f64, contact_tolerance: f64) -> Self {
        Self {
            threshold_fraction,
            contact_tolerance,
        }
    }

    /// Read the discrete state implied by the rod's current offsets.
    #[must_use]
    pub fn discretize(&self, rod: &Rod, geometry: &TravelGeometry) -> DigitPattern {
        let threshold = self.threshold_fraction * geometry.travel;
        let near = |role: Role, slot: usize, offset: f64| {
            geometry.displacement(role, slot, offset) <= threshold
        };

        let heavy = near(Role::Heavy, 0, rod.heavy().offset);

        let lights = rod.lights();
        let mut count = 0;
        while count < LIGHT_BEADS {
            let bead = &lights[count];
            let joins = if count == 0 {
                near(Role::Light, 0, bead.offset)
            } else {
                let separation = bead.offset - lights[count - 1].offset;
                separation - geometry.pitch() <= self.contact_tolerance
                    || near(Role::Light, count, bead.offset)
            };
            if !joins {
                break;
            }
            count += 1;
        }

        DigitPattern {
            heavy,
            lights: count as u8,
        }
    }

    /// Discretize the rod and write the canonical state back.
    ///
    /// Returns the derived pattern and the beads whose offsets moved.
    pub fn apply(
        &self,
        rod: &mut Rod,
        geometry: &TravelGeometry,
    ) -> (DigitPattern, Vec<(Role, usize)>) {
        let pattern = self.discretize(rod, geometry);
        let moved = rod.apply_pattern(pattern, geometry);
        (pattern, moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;

    // s = 20, g = 2, p = 22, t = 20, threshold 10.
    fn geometry() -> TravelGeometry {
        TravelGeometry::new(20.0, 2.0, 20.0)
    }

    fn policy() -> SnapPolicy {
        SnapPolicy::new(0.5, 0.5)
    }

    fn rod_with(pattern: DigitPattern) -> Rod {
        let g = geometry();
        let mut rod = Rod::new(&g);
        rod.apply_pattern(pattern, &g);
        rod
    }

    #[test]
    fn canonical_rods_snap_to_themselves() {
        let g = geometry();
        for digit in 0..=9 {
            let pattern = DigitPattern::from_digit(digit).unwrap();
            let mut rod = rod_with(pattern);
            let (derived, moved) = policy().apply(&mut rod, &g);
            assert_eq!(derived, pattern, "digit {digit}");
            assert!(moved.is_empty(), "digit {digit}");
        }
    }

    #[test]
    fn heavy_threshold() {
        let g = geometry();
        let mut rod = Rod::new(&g);
        resolve(&mut rod, Role::Heavy, 0, 10.0, &g);
        assert!(policy().discretize(&rod, &g).heavy);
        resolve(&mut rod, Role::Heavy, 0, 10.5, &g);
        assert!(!policy().discretize(&rod, &g).heavy);
    }

    #[test]
    fn partial_push_of_group_counts_prefix() {
        let g = geometry();
        let mut rod = Rod::new(&g);
        // Slot 2 pushed most of the way home carries slots 0 and 1.
        resolve(&mut rod, Role::Light, 2, 44.0 + 4.0, &g);
        let (pattern, _) = policy().apply(&mut rod, &g);
        assert_eq!(pattern.lights, 3);
        assert_eq!(rod.lights()[2].offset, 44.0);
        assert!(!rod.lights()[3].active);
        assert_eq!(rod.lights()[3].offset, 86.0);
    }

    #[test]
    fn short_push_falls_back() {
        let g = geometry();
        let mut rod = Rod::new(&g);
        // Only 8 of 20 units of travel: slot 0 still outside the threshold.
        resolve(&mut rod, Role::Light, 1, 42.0 - 8.0, &g);
        let (pattern, moved) = policy().apply(&mut rod, &g);
        assert_eq!(pattern.lights, 0);
        assert_eq!(moved, vec![(Role::Light, 0), (Role::Light, 1)]);
        assert_eq!(rod.lights()[0].offset, 20.0);
    }

    #[test]
    fn pulling_middle_bead_away_drops_it_and_followers() {
        let g = geometry();
        let mut rod = rod_with(DigitPattern { heavy: false, lights: 4 });
        resolve(&mut rod, Role::Light, 1, 22.0 + 15.0, &g);
        let (pattern, _) = policy().apply(&mut rod, &g);
        assert_eq!(pattern.lights, 1);
    }

    #[test]
    fn touching_bead_joins_even_past_threshold() {
        let policy = SnapPolicy::new(0.5, 0.5);
        let g = geometry();
        let mut rod = Rod::new(&g);
        // Slot 0 just inside the threshold; slot 1 touching it but itself
        // 10.2 units out.
        rod.set_offset(Role::Light, 0, 9.8);
        rod.set_offset(Role::Light, 1, 32.2);
        assert_eq!(policy.discretize(&rod, &g).lights, 2);
    }

    #[test]
    fn snap_is_idempotent() {
        let g = geometry();
        let mut rod = Rod::new(&g);
        resolve(&mut rod, Role::Light, 3, 50.0, &g);
        resolve(&mut rod, Role::Heavy, 0, 3.0, &g);
        policy().apply(&mut rod, &g);
        let once = rod.clone();
        let (_, moved) = policy().apply(&mut rod, &g);
        assert!(moved.is_empty());
        assert_eq!(rod, once);
    }
}
