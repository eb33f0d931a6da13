#![forbid(unsafe_code)]

//! Collision/drag resolver.
//!
//! Given the dragged bead and a desired offset, computes where the bead and
//! any neighbours it pushes end up, then writes those offsets into the rod.
//!
//! # Invariants
//!
//! 1. Light offsets stay strictly ordered by slot with at least one pitch
//!    (`bead_span + min_gap`) between leading edges.
//! 2. Every offset stays inside its zone bounds.
//! 3. Slot identity never changes; nothing is sorted by position.
//! 4. Only beads whose offset changes are written and reported.
//! 5. Resolving the same desired offset twice is a no-op the second time.
//!
//! Activation flags are untouched here; the snap policy owns them.

use soroban_core::geometry::Span;

use crate::bead::{Bead, LIGHT_BEADS, Role, Rod, TravelGeometry};

/// One bead repositioned by a resolve pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadMove {
    pub role: Role,
    pub slot: usize,
    pub from: f64,
    pub to: f64,
}

/// Move `(role, slot)` toward `desired`, pushing neighbours as needed.
///
/// Returns the beads that moved, in slot order.
pub fn resolve(
    rod: &mut Rod,
    role: Role,
    slot: usize,
    desired: f64,
    geometry: &TravelGeometry,
) -> Vec<BeadMove> {
    let planned = match role {
        Role::Heavy => {
            assert_eq!(slot, 0, "heavy bead has only slot 0");
            vec![(0, geometry.bounds(Role::Heavy).clamp(desired))]
        }
        Role::Light => {
            let current = offsets(&rod.lights);
            plan_light(&current, slot, desired, geometry.bounds(Role::Light), geometry.pitch())
                .into_iter()
                .enumerate()
                .collect()
        }
    };

    let mut moves = Vec::new();
    for (slot, to) in planned {
        let from = rod.bead(role, slot).offset;
        if from != to {
            rod.set_offset(role, slot, to);
            moves.push(BeadMove {
                role,
                slot,
                from,
                to,
            });
        }
    }
    moves
}

fn offsets(lights: &[Bead; LIGHT_BEADS]) -> [f64; LIGHT_BEADS] {
    std::array::from_fn(|k| lights[k].offset)
}

/// Compute new Light offsets for dragging `slot` to `desired`.
///
/// Pure function of its inputs; the caller applies the result.
#[must_use]
pub fn plan_light(
    current: &[f64; LIGHT_BEADS],
    slot: usize,
    desired: f64,
    bounds: Span,
    pitch: f64,
) -> [f64; LIGHT_BEADS] {
    assert!(slot < LIGHT_BEADS, "light slot {slot} out of range");

    let mut next = *current;
    let desired = bounds.clamp(desired);
    next[slot] = desired;

    if desired < current[slot] {
        // Toward the divider: push lower slots.
        let mut edge = slot;
        while edge > 0 && next[edge - 1] > next[edge] - pitch {
            next[edge - 1] = next[edge] - pitch;
            edge -= 1;
        }

        // Group blocked by the frame: pin the edge bead, rebuild outward.
        if next[edge] < bounds.min {
            next[edge] = bounds.min;
            for k in edge + 1..=slot {
                next[k] = next[k - 1] + pitch;
            }
        }
    } else if desired > current[slot] {
        // Away from the divider: push higher slots.
        let mut edge = slot;
        while edge + 1 < LIGHT_BEADS && next[edge + 1] < next[edge] + pitch {
            next[edge + 1] = next[edge] + pitch;
            edge += 1;
        }

        if next[edge] > bounds.max {
            next[edge] = bounds.max;
            for k in (slot..edge).rev() {
                next[k] = next[k + 1] - pitch;
            }
        }
    }

    next
}
