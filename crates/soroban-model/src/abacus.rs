#![forbid(unsafe_code)]

//! The bead model: authoritative per-rod, per-bead state.
//!
//! [`Abacus`] owns every rod, the gesture state machine, and the observer
//! list. Two write paths exist:
//!
//! - **Gesture path**: [`begin_drag`](Abacus::begin_drag) →
//!   [`drag_to`](Abacus::drag_to)* → [`end_drag`](Abacus::end_drag) (or
//!   [`cancel_drag`](Abacus::cancel_drag)). Offsets move continuously through
//!   the resolver; activation only changes when the snap policy runs.
//! - **Bulk path**: [`set_value`](Abacus::set_value) and friends write
//!   canonical state directly, never touching the resolver or snap policy.
//!
//! # Gesture state machine
//!
//! ```text
//!   Idle ──begin_drag──► Dragging ──end_drag / cancel_drag──► Snapping ──► Idle
//!                          │  ▲
//!                          └──┘ drag_to
//! ```
//!
//! Bulk writes and a second `begin_drag` are rejected with
//! [`AbacusError::GestureInProgress`] unless the phase is `Idle`.
//!
//! # Invariants
//!
//! 1. Light offsets on every rod are ordered by slot, one pitch apart or more.
//! 2. Active Light beads form a prefix from slot 0.
//! 3. `digit(rod) = 5·[heavy active] + active lights`, always `0..=9`.
//! 4. `value()` is the decimal join of all digits, always `<= capacity()`.
//! 5. At most one bead is dragging, and only while the phase is `Dragging`.
//!
//! [`check_invariants`](Abacus::check_invariants) reports any violation.

use std::fmt;

use soroban_core::geometry::EPSILON;

use crate::bead::{Bead, BeadId, Role, Rod, TravelGeometry};
use crate::codec::{self, DigitPattern};
use crate::config::AbacusConfig;
use crate::error::AbacusError;
use crate::observer::{AbacusObserver, BeadChange, ValueChange};
use crate::resolver::{self, BeadMove};
use crate::snap::SnapPolicy;

/// Where the single allowed gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging(BeadId),
    Snapping(BeadId),
}

/// Read-only view of one bead for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadState {
    pub id: BeadId,
    pub offset: f64,
    pub active: bool,
    pub dragging: bool,
}

/// A bead frame of `config.rods` rods.
pub struct Abacus {
    config: AbacusConfig,
    geometry: TravelGeometry,
    policy: SnapPolicy,
    rods: Vec<Rod>,
    phase: GesturePhase,
    observers: Vec<Box<dyn AbacusObserver>>,
}

impl fmt::Debug for Abacus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abacus")
            .field("rods", &self.rods.len())
            .field("value", &self.value())
            .field("phase", &self.phase)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Abacus {
    /// Build a frame showing zero.
    pub fn new(config: AbacusConfig) -> Result<Self, AbacusError> {
        let config = config.validated()?;
        let geometry = config.geometry();
        let rods = (0..config.rods).map(|_| Rod::new(&geometry)).collect();

        tracing::debug!(rods = config.rods, "abacus created");

        Ok(Self {
            policy: SnapPolicy::new(config.threshold_fraction, config.contact_tolerance),
            config,
            geometry,
            rods,
            phase: GesturePhase::Idle,
            observers: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AbacusConfig {
        &self.config
    }

    #[must_use]
    pub fn geometry(&self) -> &TravelGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn rod_count(&self) -> usize {
        self.rods.len()
    }

    #[must_use]
    pub fn rod(&self, rod: usize) -> Option<&Rod> {
        self.rods.get(rod)
    }

    /// Largest representable value, `10^rods - 1`.
    #[must_use]
    pub fn capacity(&self) -> u128 {
        codec::capacity(self.rods.len())
    }

    /// Digit shown on `rod`.
    ///
    /// # Panics
    ///
    /// Panics if `rod` is out of range.
    #[must_use]
    #[track_caller]
    pub fn digit(&self, rod: usize) -> u8 {
        self.rod_ref(rod).digit()
    }

    /// All digits, most significant first.
    #[must_use]
    pub fn digits(&self) -> Vec<u8> {
        self.rods.iter().map(Rod::digit).collect()
    }

    /// Total value shown by the frame.
    #[must_use]
    pub fn value(&self) -> u128 {
        codec::join_digits(&self.digits())
    }

    /// # Panics
    ///
    /// Panics if the bead does not exist.
    #[must_use]
    #[track_caller]
    pub fn bead(&self, id: BeadId) -> &Bead {
        self.rod_ref(id.rod).bead(id.role, id.slot)
    }

    /// Every bead, rod by rod, Heavy first then Light slots in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BeadState> {
        let per_rod = Role::Heavy.beads_per_rod() + Role::Light.beads_per_rod();
        let mut out = Vec::with_capacity(self.rods.len() * per_rod);
        for (index, rod) in self.rods.iter().enumerate() {
            let heavy = std::iter::once((BeadId::heavy(index), rod.heavy()));
            let lights = rod
                .lights()
                .iter()
                .map(|bead| (BeadId::light(index, bead.slot), bead));
            out.extend(heavy.chain(lights).map(|(id, bead)| BeadState {
                id,
                offset: bead.offset,
                active: bead.active,
                dragging: bead.dragging,
            }));
        }
        out
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    /// Register an observer. Observers live as long as the model.
    pub fn subscribe(&mut self, observer: impl AbacusObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Bulk path
    // -----------------------------------------------------------------------

    /// Show `value`, writing canonical offsets for every rod.
    ///
    /// Always emits exactly one [`ValueChange`], even if the value is
    /// unchanged. Out-of-range values are rejected, never clamped.
    pub fn set_value(&mut self, value: u128) -> Result<(), AbacusError> {
        self.ensure_idle("set_value")?;
        let digits = codec::split_value(value, self.rods.len()).inspect_err(|_| {
            tracing::warn!(value, max = self.capacity(), "set_value rejected: out of range");
        })?;
        let patterns = digits
            .iter()
            .map(|&d| DigitPattern::from_digit(d))
            .collect::<Result<Vec<_>, _>>()?;

        let previous = self.value();
        let mut moved = Vec::new();
        for (rod, pattern) in patterns.into_iter().enumerate() {
            moved.extend(self.write_pattern(rod, pattern));
        }

        tracing::debug!(value, previous, moved = moved.len(), "value set");
        self.commit(previous, &moved, None);
        Ok(())
    }

    /// Signed entry point for hosts that parse user input; negatives are a
    /// range error.
    pub fn set_value_signed(&mut self, value: i128) -> Result<(), AbacusError> {
        match u128::try_from(value) {
            Ok(v) => self.set_value(v),
            Err(_) => {
                self.ensure_idle("set_value")?;
                tracing::warn!(value, "set_value rejected: negative");
                Err(AbacusError::ValueOutOfRange {
                    value,
                    max: self.capacity(),
                })
            }
        }
    }

    /// Shorthand for `set_value(0)`.
    pub fn clear(&mut self) -> Result<(), AbacusError> {
        self.set_value(0)
    }

    /// Show `digit` on one rod, leaving the others alone.
    pub fn set_digit(&mut self, rod: usize, digit: u8) -> Result<(), AbacusError> {
        self.ensure_idle("set_digit")?;
        if rod >= self.rods.len() {
            return Err(AbacusError::RodOutOfRange {
                rod,
                rods: self.rods.len(),
            });
        }
        let pattern = DigitPattern::from_digit(digit)?;

        let previous = self.value();
        let moved = self.write_pattern(rod, pattern);
        tracing::debug!(rod, digit, "digit set");
        self.commit(previous, &moved, None);
        Ok(())
    }

    /// Add `delta` to the shown value. Returns the new value.
    pub fn add(&mut self, delta: u128) -> Result<u128, AbacusError> {
        let target = codec::signed(self.value()).saturating_add(codec::signed(delta));
        self.set_checked(target)
    }

    /// Subtract `delta` from the shown value. Returns the new value.
    pub fn subtract(&mut self, delta: u128) -> Result<u128, AbacusError> {
        let target = codec::signed(self.value()).saturating_sub(codec::signed(delta));
        self.set_checked(target)
    }

    fn set_checked(&mut self, target: i128) -> Result<u128, AbacusError> {
        self.ensure_idle("arithmetic")?;
        let max = self.capacity();
        let value = u128::try_from(target)
            .ok()
            .filter(|&v| v <= max)
            .ok_or(AbacusError::ValueOutOfRange { value: target, max })
            .inspect_err(|_| {
                tracing::warn!(requested = %target, max, "arithmetic rejected: out of range");
            })?;
        self.set_value(value)?;
        Ok(value)
    }

    /// Tap behaviour: flip a bead as if it had been pushed by hand.
    ///
    /// Heavy flips its activation. Light slot `k` leaves `k` beads active if
    /// it was active, otherwise `k + 1`, which keeps the prefix intact.
    pub fn toggle(&mut self, bead: BeadId) -> Result<ValueChange, AbacusError> {
        self.ensure_idle("toggle")?;
        let rod = self.rod_ref(bead.rod);
        let mut pattern = rod.pattern();
        match bead.role {
            Role::Heavy => pattern.heavy = !pattern.heavy,
            Role::Light => {
                let was_active = rod.bead(Role::Light, bead.slot).active;
                let count = if was_active { bead.slot } else { bead.slot + 1 };
                pattern.lights = count as u8;
            }
        }

        let previous = self.value();
        let moved = self.write_pattern(bead.rod, pattern);
        let active = self.bead(bead).active;
        tracing::debug!(rod = bead.rod, slot = bead.slot, role = ?bead.role, active, "bead toggled");
        Ok(self.commit(previous, &moved, Some(BeadChange { bead, active })))
    }

    /// Rebuild the bead set for a new configuration.
    ///
    /// The current value is kept when it still fits, otherwise the frame is
    /// cleared. Observers receive `rebuild` followed by one value change.
    pub fn reconfigure(&mut self, config: AbacusConfig) -> Result<(), AbacusError> {
        self.ensure_idle("reconfigure")?;
        let config = config.validated()?;

        let previous = self.value();
        let keep = if previous <= codec::capacity(config.rods) {
            previous
        } else {
            0
        };

        self.geometry = config.geometry();
        self.policy = SnapPolicy::new(config.threshold_fraction, config.contact_tolerance);
        self.rods = (0..config.rods).map(|_| Rod::new(&self.geometry)).collect();
        self.config = config;

        let digits = codec::split_value(keep, self.rods.len())?;
        for (rod, digit) in digits.into_iter().enumerate() {
            self.write_pattern(rod, DigitPattern::from_digit(digit)?);
        }

        tracing::info!(rods = self.rods.len(), kept = keep, previous, "abacus reconfigured");

        let rods = self.rods.len();
        for observer in &mut self.observers {
            observer.rebuild(rods);
        }
        self.commit(previous, &[], None);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Gesture path
    // -----------------------------------------------------------------------

    /// Start dragging `bead`.
    ///
    /// # Panics
    ///
    /// Panics if the bead does not exist.
    #[track_caller]
    pub fn begin_drag(&mut self, bead: BeadId) -> Result<(), AbacusError> {
        // Validate identity before the phase so a bad id always fails fast.
        let _ = self.bead(bead);
        self.ensure_idle("begin_drag")?;

        self.rods[bead.rod].set_dragging(bead.role, bead.slot, true);
        self.phase = GesturePhase::Dragging(bead);
        tracing::debug!(rod = bead.rod, slot = bead.slot, role = ?bead.role, "drag started");
        Ok(())
    }

    /// Move the dragged bead toward `desired` (a rod-local offset).
    ///
    /// Returns the beads that moved. Activation flags are not touched.
    ///
    /// # Panics
    ///
    /// Panics if no drag is in progress.
    #[track_caller]
    pub fn drag_to(&mut self, desired: f64) -> Vec<BeadMove> {
        let GesturePhase::Dragging(bead) = self.phase else {
            panic!("drag update with no active gesture (phase {:?})", self.phase);
        };

        let moves = resolver::resolve(
            &mut self.rods[bead.rod],
            bead.role,
            bead.slot,
            desired,
            &self.geometry,
        );

        if !moves.is_empty() {
            tracing::trace!(rod = bead.rod, slot = bead.slot, desired, moved = moves.len(), "drag resolved");
            let ids: Vec<BeadId> = moves
                .iter()
                .map(|m| id_for(bead.rod, m.role, m.slot))
                .collect();
            self.notify_offsets(&ids);
        }
        moves
    }

    /// Release the dragged bead: snap its rod and emit one value change.
    ///
    /// # Panics
    ///
    /// Panics if no drag is in progress.
    #[track_caller]
    pub fn end_drag(&mut self) -> ValueChange {
        self.finish_gesture("released")
    }

    /// Abort the drag. Still runs the snap policy so the rod is left in a
    /// canonical state.
    ///
    /// # Panics
    ///
    /// Panics if no drag is in progress.
    #[track_caller]
    pub fn cancel_drag(&mut self) -> ValueChange {
        self.finish_gesture("cancelled")
    }

    #[track_caller]
    fn finish_gesture(&mut self, how: &'static str) -> ValueChange {
        let GesturePhase::Dragging(bead) = self.phase else {
            panic!("snap requested with no active gesture (phase {:?})", self.phase);
        };

        self.phase = GesturePhase::Snapping(bead);
        let previous = self.value();

        let rod = &mut self.rods[bead.rod];
        rod.set_dragging(bead.role, bead.slot, false);
        let (pattern, moved) = self.policy.apply(rod, &self.geometry);
        let active = rod.bead(bead.role, bead.slot).active;

        self.phase = GesturePhase::Idle;
        tracing::debug!(
            rod = bead.rod,
            slot = bead.slot,
            role = ?bead.role,
            digit = pattern.digit(),
            active,
            how,
            "drag finished"
        );

        let ids: Vec<BeadId> = moved
            .into_iter()
            .map(|(role, slot)| id_for(bead.rod, role, slot))
            .collect();
        self.commit(previous, &ids, Some(BeadChange { bead, active }))
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// List every violated invariant. Empty means healthy.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let pitch = self.geometry.pitch();
        let mut dragging = Vec::new();

        for (index, rod) in self.rods.iter().enumerate() {
            let heavy_bounds = self.geometry.bounds(Role::Heavy);
            if !heavy_bounds.contains(rod.heavy().offset) {
                issues.push(format!(
                    "rod {index}: heavy offset {} outside zone",
                    rod.heavy().offset
                ));
            }

            let light_bounds = self.geometry.bounds(Role::Light);
            let lights = rod.lights();
            for (slot, bead) in lights.iter().enumerate() {
                if !light_bounds.contains(bead.offset) {
                    issues.push(format!(
                        "rod {index}: light {slot} offset {} outside zone",
                        bead.offset
                    ));
                }
                if slot > 0 && bead.offset - lights[slot - 1].offset < pitch - EPSILON {
                    issues.push(format!(
                        "rod {index}: lights {} and {slot} closer than minimum gap",
                        slot - 1
                    ));
                }
                if slot > 0 && bead.active && !lights[slot - 1].active {
                    issues.push(format!("rod {index}: active lights are not a prefix"));
                }
            }

            if rod.heavy().dragging {
                dragging.push(BeadId::heavy(index));
            }
            dragging.extend(
                lights
                    .iter()
                    .filter(|b| b.dragging)
                    .map(|b| BeadId::light(index, b.slot)),
            );
        }

        match (self.phase, dragging.as_slice()) {
            (GesturePhase::Idle, []) => {}
            (GesturePhase::Dragging(bead), [only]) if *only == bead => {}
            (phase, beads) => issues.push(format!(
                "dragging beads {beads:?} inconsistent with phase {phase:?}"
            )),
        }

        issues
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    #[track_caller]
    fn rod_ref(&self, rod: usize) -> &Rod {
        match self.rods.get(rod) {
            Some(r) => r,
            None => panic!("rod {rod} out of range for a {}-rod frame", self.rods.len()),
        }
    }

    fn ensure_idle(&self, op: &'static str) -> Result<(), AbacusError> {
        if self.phase == GesturePhase::Idle {
            Ok(())
        } else {
            tracing::warn!(op, phase = ?self.phase, "rejected: gesture in progress");
            Err(AbacusError::GestureInProgress)
        }
    }

    fn write_pattern(&mut self, rod: usize, pattern: DigitPattern) -> Vec<BeadId> {
        self.rods[rod]
            .apply_pattern(pattern, &self.geometry)
            .into_iter()
            .map(|(role, slot)| id_for(rod, role, slot))
            .collect()
    }

    fn commit(
        &mut self,
        previous: u128,
        moved: &[BeadId],
        trigger: Option<BeadChange>,
    ) -> ValueChange {
        if !moved.is_empty() {
            self.notify_offsets(moved);
        }
        let change = ValueChange {
            value: self.value(),
            previous,
            trigger,
        };
        for observer in &mut self.observers {
            observer.value_changed(&change);
        }
        change
    }

    fn notify_offsets(&mut self, beads: &[BeadId]) {
        for observer in &mut self.observers {
            observer.offsets_changed(beads);
        }
    }
}

fn id_for(rod: usize, role: Role, slot: usize) -> BeadId {
    match role {
        Role::Heavy => BeadId::heavy(rod),
        Role::Light => BeadId::light(rod, slot),
    }
}
