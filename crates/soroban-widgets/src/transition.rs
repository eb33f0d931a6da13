#![forbid(unsafe_code)]

//! Animated bead transitions.
//!
//! The model always holds final offsets. [`BeadTransitions`] keeps a separate
//! *displayed* offset per bead and glides it toward the model with a
//! critically damped [`Spring`]:
//!
//! - after a snap or bulk write, each moved bead retargets from wherever it is
//!   currently displayed;
//! - while a gesture is active every bead is shown exactly where the model
//!   has it, so direct manipulation never lags;
//! - a rod-count change rebuilds everything at rest.

use std::time::Duration;

use soroban_core::animation::{Animation, Spring};
use soroban_model::{Abacus, BeadId, Role};

const BEADS_PER_ROD: usize = Role::Heavy.beads_per_rod() + Role::Light.beads_per_rod();

/// Default spring stiffness for bead glides.
pub const DEFAULT_STIFFNESS: f64 = 300.0;

fn index(id: BeadId) -> usize {
    let within = match id.role {
        Role::Heavy => 0,
        Role::Light => Role::Heavy.beads_per_rod() + id.slot,
    };
    id.rod * BEADS_PER_ROD + within
}

/// Displayed offsets for every bead of one frame.
#[derive(Debug, Clone)]
pub struct BeadTransitions {
    rods: usize,
    stiffness: f64,
    springs: Vec<Spring>,
}

impl BeadTransitions {
    /// All beads at rest where the model has them.
    #[must_use]
    pub fn new(abacus: &Abacus) -> Self {
        Self::with_stiffness(abacus, DEFAULT_STIFFNESS)
    }

    #[must_use]
    pub fn with_stiffness(abacus: &Abacus, stiffness: f64) -> Self {
        let springs = abacus
            .snapshot()
            .iter()
            .map(|bead| Spring::critical(bead.offset, bead.offset, stiffness))
            .collect();
        Self {
            rods: abacus.rod_count(),
            stiffness,
            springs,
        }
    }

    /// Bring displayed targets in line with the model.
    pub fn sync(&mut self, abacus: &Abacus) {
        if abacus.rod_count() != self.rods {
            *self = Self::with_stiffness(abacus, self.stiffness);
            return;
        }

        let immediate = abacus.is_gesture_active();
        for bead in abacus.snapshot() {
            let spring = &mut self.springs[index(bead.id)];
            if spring.target() != bead.offset {
                spring.set_target(bead.offset);
            }
            if immediate {
                spring.finish();
            }
        }
    }

    /// Displayed offset of a bead, or `None` if it is not in this frame.
    #[must_use]
    pub fn displayed(&self, id: BeadId) -> Option<f64> {
        if id.rod >= self.rods {
            return None;
        }
        self.springs.get(index(id)).map(Spring::position)
    }

    /// Whether every bead has reached its target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.springs.iter().all(Animation::is_complete)
    }

    /// Jump every bead to its target.
    pub fn finish_all(&mut self) {
        self.springs.iter_mut().for_each(Animation::finish);
    }

    /// Advance all running glides by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        for spring in self.springs.iter_mut().filter(|s| !s.is_complete()) {
            spring.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_model::AbacusConfig;

    const FRAME: Duration = Duration::from_millis(16);

    fn abacus() -> Abacus {
        Abacus::new(AbacusConfig::with_rods(2)).unwrap()
    }

    #[test]
    fn starts_settled_at_model_offsets() {
        let ab = abacus();
        let t = BeadTransitions::new(&ab);
        assert!(t.is_settled());
        assert_eq!(t.displayed(BeadId::heavy(0)), Some(ab.geometry().travel));
        assert_eq!(t.displayed(BeadId::heavy(2)), None);
    }

    #[test]
    fn bulk_write_glides() {
        let mut ab = abacus();
        let mut t = BeadTransitions::new(&ab);
        ab.set_value(5).unwrap();
        t.sync(&ab);

        let travel = ab.geometry().travel;
        assert!(!t.is_settled());
        assert_eq!(t.displayed(BeadId::heavy(1)), Some(travel));

        t.tick(FRAME);
        let mid = t.displayed(BeadId::heavy(1)).unwrap();
        assert!(mid < travel && mid > 0.0, "mid-glide offset {mid}");

        for _ in 0..200 {
            t.tick(FRAME);
        }
        assert!(t.is_settled());
        assert_eq!(t.displayed(BeadId::heavy(1)), Some(0.0));
    }

    #[test]
    fn retarget_continues_from_displayed_position() {
        let mut ab = abacus();
        let mut t = BeadTransitions::new(&ab);
        ab.set_value(5).unwrap();
        t.sync(&ab);
        for _ in 0..3 {
            t.tick(FRAME);
        }
        let mid = t.displayed(BeadId::heavy(1)).unwrap();

        ab.set_value(0).unwrap();
        t.sync(&ab);
        assert_eq!(t.displayed(BeadId::heavy(1)), Some(mid));
    }

    #[test]
    fn gesture_shows_model_offsets_immediately() {
        let mut ab = abacus();
        let mut t = BeadTransitions::new(&ab);
        ab.set_value(5).unwrap();
        t.sync(&ab);
        assert!(!t.is_settled());

        ab.begin_drag(BeadId::light(0, 0)).unwrap();
        ab.drag_to(3.0);
        t.sync(&ab);
        assert!(t.is_settled());
        assert_eq!(t.displayed(BeadId::heavy(1)), Some(0.0));
        assert_eq!(t.displayed(BeadId::light(0, 0)), Some(3.0));
        ab.end_drag();
    }

    #[test]
    fn rod_count_change_rebuilds() {
        let mut ab = abacus();
        let mut t = BeadTransitions::new(&ab);
        ab.reconfigure(AbacusConfig::with_rods(4)).unwrap();
        t.sync(&ab);
        assert!(t.is_settled());
        assert!(t.displayed(BeadId::light(3, 3)).is_some());
    }
}
