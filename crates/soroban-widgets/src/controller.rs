#![forbid(unsafe_code)]

//! Pointer interaction controller.
//!
//! Thin orchestration between the pointer stream and the model:
//!
//! ```text
//!   PointerEvent ─► DragRecognizer ─► DragEvent ─► hit test ─► Abacus
//! ```
//!
//! - `DragStart` hit-tests the press position against displayed offsets and
//!   grabs the bead drawn under it.
//! - `DragMove` converts the total vertical pointer travel since the press
//!   into a desired offset along the grabbed bead's axis.
//! - `DragEnd` / `DragCancel` release the bead through the snap policy.
//! - `Tap` on a bead toggles it.
//!
//! Presses that miss every bead are ignored. Displayed offsets are kept in a
//! [`BeadTransitions`] and resynchronised after every event.

use std::time::Duration;

use soroban_core::event::PointerEvent;
use soroban_core::geometry::Point;
use soroban_core::gesture::{DragConfig, DragEvent, DragRecognizer};
use soroban_model::{Abacus, BeadId, ValueChange};

use crate::layout::FrameLayout;
use crate::transition::BeadTransitions;

/// What the controller did with one drag event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// A bead was grabbed.
    Grabbed(BeadId),
    /// The grabbed bead moved, pushing `moved - 1` neighbours along.
    Dragged { bead: BeadId, moved: usize },
    /// The grabbed bead was released and its rod snapped.
    Released(ValueChange),
    /// The platform aborted the drag; the rod still snapped.
    Cancelled(ValueChange),
    /// A bead was tapped and toggled.
    Toggled(ValueChange),
    /// The model refused the interaction (another gesture is active).
    Rejected(BeadId),
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    bead: BeadId,
    /// Displayed offset at the moment of the grab.
    origin: f64,
    /// Pointer position at the press.
    start: Point,
}

/// Drives one [`Abacus`] from a pointer stream.
#[derive(Debug, Clone)]
pub struct InteractionController {
    recognizer: DragRecognizer,
    layout: FrameLayout,
    transitions: BeadTransitions,
    grab: Option<Grab>,
}

impl InteractionController {
    #[must_use]
    pub fn new(abacus: &Abacus, layout: FrameLayout) -> Self {
        Self {
            recognizer: DragRecognizer::default(),
            layout,
            transitions: BeadTransitions::new(abacus),
            grab: None,
        }
    }

    #[must_use]
    pub fn with_drag_config(mut self, config: DragConfig) -> Self {
        self.recognizer = DragRecognizer::new(config);
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: BeadTransitions) -> Self {
        self.transitions = transitions;
        self
    }

    #[must_use]
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Replace the layout, e.g. after a resize or a rod-count change.
    pub fn set_layout(&mut self, layout: FrameLayout) {
        self.layout = layout;
    }

    #[must_use]
    pub fn transitions(&self) -> &BeadTransitions {
        &self.transitions
    }

    /// Bead currently held by the pointer.
    #[must_use]
    pub fn grabbed(&self) -> Option<BeadId> {
        self.grab.map(|g| g.bead)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Feed one pointer event.
    pub fn process(&mut self, abacus: &mut Abacus, event: &PointerEvent) -> Vec<Interaction> {
        let mut out = Vec::new();
        for drag in self.recognizer.process(event) {
            if let Some(interaction) = self.handle(abacus, drag) {
                out.push(interaction);
            }
        }
        self.transitions.sync(abacus);
        out
    }

    fn handle(&mut self, abacus: &mut Abacus, drag: DragEvent) -> Option<Interaction> {
        match drag {
            DragEvent::DragStart { start } => {
                let bead = self.bead_at(abacus, start)?;
                if abacus.begin_drag(bead).is_err() {
                    return Some(Interaction::Rejected(bead));
                }
                let origin = self.drawn_offset(abacus, bead);
                self.transitions.finish_all();
                self.grab = Some(Grab {
                    bead,
                    origin,
                    start,
                });
                #[cfg(feature = "tracing")]
                tracing::debug!(rod = bead.rod, slot = bead.slot, role = ?bead.role, "bead grabbed");
                Some(Interaction::Grabbed(bead))
            }
            DragEvent::DragMove { current, .. } => {
                let grab = self.grab?;
                let dy = current.y - grab.start.y;
                let desired = grab.origin + FrameLayout::axis_delta(grab.bead.role, dy);
                let moves = abacus.drag_to(desired);
                (!moves.is_empty()).then_some(Interaction::Dragged {
                    bead: grab.bead,
                    moved: moves.len(),
                })
            }
            DragEvent::DragEnd { .. } => {
                self.grab.take()?;
                Some(Interaction::Released(abacus.end_drag()))
            }
            DragEvent::DragCancel => {
                self.grab.take()?;
                Some(Interaction::Cancelled(abacus.cancel_drag()))
            }
            DragEvent::Tap { pos } => {
                let bead = self.bead_at(abacus, pos)?;
                match abacus.toggle(bead) {
                    Ok(change) => Some(Interaction::Toggled(change)),
                    Err(_) => Some(Interaction::Rejected(bead)),
                }
            }
        }
    }

    /// Bead drawn under `point`, which may differ from the model mid-glide.
    fn bead_at(&self, abacus: &Abacus, point: Point) -> Option<BeadId> {
        self.layout
            .hit_test_with(abacus.rod_count(), point, |id| self.drawn_offset(abacus, id))
    }

    fn drawn_offset(&self, abacus: &Abacus, id: BeadId) -> f64 {
        self.transitions
            .displayed(id)
            .unwrap_or_else(|| abacus.bead(id).offset)
    }

    /// Release any held bead and forget pointer state.
    pub fn reset(&mut self, abacus: &mut Abacus) -> Option<ValueChange> {
        self.recognizer.reset();
        let change = self.grab.take().map(|_| abacus.cancel_drag());
        self.transitions.sync(abacus);
        change
    }

    /// Resynchronise displayed offsets after a write made outside the
    /// controller (`set_value`, `reconfigure`, ...).
    pub fn sync(&mut self, abacus: &Abacus) {
        self.transitions.sync(abacus);
    }

    /// Advance displayed-offset glides.
    pub fn tick(&mut self, dt: Duration) {
        self.transitions.tick(dt);
    }

    /// Where a bead should be drawn right now.
    #[must_use]
    pub fn displayed_offset(&self, id: BeadId) -> Option<f64> {
        self.transitions.displayed(id)
    }
}
