#![forbid(unsafe_code)]

//! Change notifications for rendering and application collaborators.
//!
//! Observers are called synchronously from inside the mutating call, in
//! subscription order. Nothing is batched or deferred.

use crate::bead::BeadId;

/// Bead that triggered a value change and its new discrete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeadChange {
    pub bead: BeadId,
    pub active: bool,
}

/// Emitted once per bulk write, tap toggle, and gesture end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChange {
    pub value: u128,
    pub previous: u128,
    /// `None` for programmatic writes.
    pub trigger: Option<BeadChange>,
}

impl ValueChange {
    /// Whether the total actually moved.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.value != self.previous
    }
}

/// Receives model notifications.
///
/// Only [`value_changed`](AbacusObserver::value_changed) is required; the
/// rendering hooks default to no-ops.
pub trait AbacusObserver {
    fn value_changed(&mut self, change: &ValueChange);

    /// Beads whose offsets moved; fired on every drag frame that moves
    /// something and after each snap or bulk write that moves something.
    fn offsets_changed(&mut self, _beads: &[BeadId]) {}

    /// The bead set was rebuilt (rod count may differ); redraw everything.
    fn rebuild(&mut self, _rods: usize) {}
}

impl<F> AbacusObserver for F
where
    F: FnMut(&ValueChange),
{
    fn value_changed(&mut self, change: &ValueChange) {
        self(change);
    }
}
