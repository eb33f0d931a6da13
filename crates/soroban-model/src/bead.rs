#![forbid(unsafe_code)]

//! Beads, rods, and the travel-axis geometry they live on.
//!
//! # Axis convention
//!
//! Every offset is the distance from the divider to the bead's
//! divider-facing edge, measured along the rod away from the divider. Smaller
//! offsets are closer to the divider in both zones, so the Heavy and Light
//! code paths share one direction convention.
//!
//! With `s = bead_span`, `g = min_gap`, `p = s + g` and `t = travel`:
//!
//! | Bead          | Active rest | Inactive rest | Zone bounds          |
//! |---------------|-------------|---------------|----------------------|
//! | Heavy         | `0`         | `t`           | `[0, t]`             |
//! | Light slot k  | `k·p`       | `t + k·p`     | `[0, t + 3·p]`       |

use soroban_core::geometry::Span;

use crate::codec::DigitPattern;

/// Light beads per rod.
pub const LIGHT_BEADS: usize = 4;

/// Bead role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Worth 5; alone in its zone.
    Heavy,
    /// Worth 1; one of a stack of [`LIGHT_BEADS`].
    Light,
}

impl Role {
    /// Number of beads sharing this role's zone on one rod.
    #[must_use]
    pub const fn beads_per_rod(self) -> usize {
        match self {
            Self::Heavy => 1,
            Self::Light => LIGHT_BEADS,
        }
    }
}

/// Identity of one physical bead.
///
/// Slot identity is fixed to the physical bead and never derived from
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeadId {
    pub rod: usize,
    pub role: Role,
    /// 0 for Heavy, `0..LIGHT_BEADS` for Light (0 nearest the divider).
    pub slot: usize,
}

impl BeadId {
    #[must_use]
    pub const fn heavy(rod: usize) -> Self {
        Self {
            rod,
            role: Role::Heavy,
            slot: 0,
        }
    }

    /// # Panics
    ///
    /// Panics if `slot >= LIGHT_BEADS`.
    #[must_use]
    #[track_caller]
    pub const fn light(rod: usize, slot: usize) -> Self {
        assert!(slot < LIGHT_BEADS, "light slot out of range");
        Self {
            rod,
            role: Role::Light,
            slot,
        }
    }
}

/// State of a single bead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bead {
    pub role: Role,
    pub slot: usize,
    /// Continuous position along the rod (see module docs).
    pub offset: f64,
    /// Authoritative discrete state used for value computation.
    pub active: bool,
    pub dragging: bool,
}

impl Bead {
    fn at_rest(role: Role, slot: usize, geometry: &TravelGeometry) -> Self {
        Self {
            role,
            slot,
            offset: geometry.canonical_offset(role, slot, false),
            active: false,
            dragging: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TravelGeometry
// ---------------------------------------------------------------------------

/// Axis lengths derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelGeometry {
    pub bead_span: f64,
    pub min_gap: f64,
    pub travel: f64,
}

impl TravelGeometry {
    #[must_use]
    pub const fn new(bead_span: f64, min_gap: f64, travel: f64) -> Self {
        Self {
            bead_span,
            min_gap,
            travel,
        }
    }

    /// Distance between the leading edges of two touching Light beads.
    #[inline]
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.bead_span + self.min_gap
    }

    /// Length of the Heavy zone including the bead itself.
    #[must_use]
    pub fn heavy_zone_len(&self) -> f64 {
        self.travel + self.bead_span
    }

    /// Length of the Light zone including the whole stack.
    #[must_use]
    pub fn light_zone_len(&self) -> f64 {
        self.travel + LIGHT_BEADS as f64 * self.bead_span + (LIGHT_BEADS - 1) as f64 * self.min_gap
    }

    /// Legal offsets for any single bead of `role`, ignoring neighbours.
    #[must_use]
    pub fn bounds(&self, role: Role) -> Span {
        match role {
            Role::Heavy => Span::new(0.0, self.travel),
            Role::Light => Span::new(0.0, self.light_zone_len() - self.bead_span),
        }
    }

    /// Rest offset of a bead for the given discrete state.
    #[must_use]
    pub fn canonical_offset(&self, role: Role, slot: usize, active: bool) -> f64 {
        let base = match role {
            Role::Heavy => 0.0,
            Role::Light => slot as f64 * self.pitch(),
        };
        if active { base } else { base + self.travel }
    }

    /// How far a bead sits from its active rest position.
    #[must_use]
    pub fn displacement(&self, role: Role, slot: usize, offset: f64) -> f64 {
        offset - self.canonical_offset(role, slot, true)
    }
}

// ---------------------------------------------------------------------------
// Rod
// ---------------------------------------------------------------------------

/// One digit column: a Heavy bead and a stack of Light beads.
///
/// A rod is exclusively owned by the model; the resolver and snap policy
/// borrow one rod mutably for the duration of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Rod {
    pub(crate) heavy: Bead,
    pub(crate) lights: [Bead; LIGHT_BEADS],
}

impl Rod {
    /// All beads inactive at their canonical offsets.
    #[must_use]
    pub fn new(geometry: &TravelGeometry) -> Self {
        Self {
            heavy: Bead::at_rest(Role::Heavy, 0, geometry),
            lights: std::array::from_fn(|slot| Bead::at_rest(Role::Light, slot, geometry)),
        }
    }

    #[must_use]
    pub fn heavy(&self) -> &Bead {
        &self.heavy
    }

    #[must_use]
    pub fn lights(&self) -> &[Bead; LIGHT_BEADS] {
        &self.lights
    }

    /// # Panics
    ///
    /// Panics on a slot that does not exist for `role`.
    #[must_use]
    #[track_caller]
    pub fn bead(&self, role: Role, slot: usize) -> &Bead {
        match role {
            Role::Heavy => {
                assert_eq!(slot, 0, "heavy bead has only slot 0");
                &self.heavy
            }
            Role::Light => &self.lights[slot],
        }
    }

    #[track_caller]
    pub(crate) fn bead_mut(&mut self, role: Role, slot: usize) -> &mut Bead {
        match role {
            Role::Heavy => {
                assert_eq!(slot, 0, "heavy bead has only slot 0");
                &mut self.heavy
            }
            Role::Light => &mut self.lights[slot],
        }
    }

    pub(crate) fn set_offset(&mut self, role: Role, slot: usize, offset: f64) {
        self.bead_mut(role, slot).offset = offset;
    }

    pub(crate) fn set_active(&mut self, role: Role, slot: usize, active: bool) {
        self.bead_mut(role, slot).active = active;
    }

    pub(crate) fn set_dragging(&mut self, role: Role, slot: usize, dragging: bool) {
        self.bead_mut(role, slot).dragging = dragging;
    }

    /// Current discrete state.
    #[must_use]
    pub fn pattern(&self) -> DigitPattern {
        DigitPattern {
            heavy: self.heavy.active,
            lights: self.lights.iter().filter(|b| b.active).count() as u8,
        }
    }

    /// Column digit: `5·[heavy active] + active lights`.
    #[must_use]
    pub fn digit(&self) -> u8 {
        self.pattern().digit()
    }

    /// Write activation flags and canonical offsets for `pattern`.
    ///
    /// Returns the `(role, slot)` of every bead whose offset moved.
    pub(crate) fn apply_pattern(
        &mut self,
        pattern: DigitPattern,
        geometry: &TravelGeometry,
    ) -> Vec<(Role, usize)> {
        let lights = usize::from(pattern.lights);
        let states = std::iter::once((Role::Heavy, 0, pattern.heavy))
            .chain((0..LIGHT_BEADS).map(|slot| (Role::Light, slot, slot < lights)));

        let mut moved = Vec::new();
        for (role, slot, active) in states {
            let target = geometry.canonical_offset(role, slot, active);
            self.set_active(role, slot, active);
            if self.bead(role, slot).offset != target {
                self.set_offset(role, slot, target);
                moved.push((role, slot));
            }
        }
        moved
    }

    /// Whether any bead on this rod is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.heavy.dragging || self.lights.iter().any(|b| b.dragging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> TravelGeometry {
        TravelGeometry::new(20.0, 2.0, 20.0)
    }

    #[test]
    fn canonical_offsets() {
        let g = geometry();
        assert_eq!(g.canonical_offset(Role::Heavy, 0, true), 0.0);
        assert_eq!(g.canonical_offset(Role::Heavy, 0, false), 20.0);
        assert_eq!(g.canonical_offset(Role::Light, 0, true), 0.0);
        assert_eq!(g.canonical_offset(Role::Light, 3, true), 66.0);
        assert_eq!(g.canonical_offset(Role::Light, 3, false), 86.0);
    }

    #[test]
    fn light_bounds_cover_the_stack() {
        let g = geometry();
        assert_eq!(g.light_zone_len(), 20.0 + 80.0 + 6.0);
        let bounds = g.bounds(Role::Light);
        assert_eq!(bounds.min, 0.0);
        // Slot 3 fully inactive sits exactly at the far edge.
        assert_eq!(bounds.max, g.canonical_offset(Role::Light, 3, false));
        assert_eq!(g.bounds(Role::Heavy).max, 20.0);
    }

    #[test]
    fn new_rod_is_zero() {
        let rod = Rod::new(&geometry());
        assert_eq!(rod.digit(), 0);
        assert!(!rod.is_dragging());
        assert_eq!(rod.lights()[1].offset, 42.0);
    }

    #[test]
    fn apply_pattern_reports_moved_beads_only() {
        let g = geometry();
        let mut rod = Rod::new(&g);
        let moved = rod.apply_pattern(DigitPattern { heavy: true, lights: 2 }, &g);
        assert_eq!(
            moved,
            vec![(Role::Heavy, 0), (Role::Light, 0), (Role::Light, 1)]
        );
        assert_eq!(rod.digit(), 7);

        let moved = rod.apply_pattern(DigitPattern { heavy: true, lights: 2 }, &g);
        assert!(moved.is_empty());
    }

    #[test]
    #[should_panic(expected = "light slot out of range")]
    fn light_id_rejects_bad_slot() {
        let _ = BeadId::light(0, LIGHT_BEADS);
    }

    #[test]
    #[should_panic(expected = "heavy bead has only slot 0")]
    fn heavy_lookup_rejects_bad_slot() {
        let rod = Rod::new(&geometry());
        let _ = rod.bead(Role::Heavy, 1);
    }
}
