#![forbid(unsafe_code)]

//! Soroban public facade crate.
//!
//! Re-exports the model, input and widget layers and offers [`Soroban`], a
//! frame bundled with its pointer controller so hosts only need to forward
//! pointer events, ticks and value writes.
//!
//! ```
//! use soroban::prelude::*;
//!
//! let mut frame = Soroban::new(AbacusConfig::with_rods(3))?;
//! frame.set_value(509)?;
//! assert_eq!(frame.abacus().digits(), vec![5, 0, 9]);
//! # Ok::<(), soroban::Error>(())
//! ```

use std::time::Duration;

// --- Core re-exports -------------------------------------------------------

pub use soroban_core::animation::{Animation, Spring};
pub use soroban_core::event::{PointerEvent, PointerEventKind};
pub use soroban_core::geometry::{Point, Rect, Span};
pub use soroban_core::gesture::{DragConfig, DragEvent, DragRecognizer};

// --- Model re-exports ------------------------------------------------------

pub use soroban_model::{
    Abacus, AbacusConfig, AbacusError, AbacusObserver, Bead, BeadChange, BeadId, BeadMove,
    BeadState, ConfigError, DigitPattern, GesturePhase, LIGHT_BEADS, MAX_RODS, Role, Rod,
    SnapPolicy, TravelGeometry, ValueChange,
};

// --- Widget re-exports -----------------------------------------------------

pub use soroban_widgets::{BeadTransitions, FrameLayout, Interaction, InteractionController};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
pub type Error = AbacusError;

/// Standard result type for Soroban APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Frame facade ---------------------------------------------------------

/// An abacus together with the controller that drives it.
///
/// Every write goes through here so displayed offsets stay in step with the
/// model.
#[derive(Debug)]
pub struct Soroban {
    abacus: Abacus,
    controller: InteractionController,
}

impl Soroban {
    /// Build a frame showing zero with the default layout.
    pub fn new(config: AbacusConfig) -> Result<Self> {
        let abacus = Abacus::new(config)?;
        let controller = InteractionController::new(&abacus, FrameLayout::for_abacus(&abacus));
        Ok(Self { abacus, controller })
    }

    /// Load the configuration from a TOML file.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(AbacusConfig::from_toml_file(path)?)
    }

    #[must_use]
    pub fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.controller.set_layout(layout);
        self
    }

    #[must_use]
    pub fn abacus(&self) -> &Abacus {
        &self.abacus
    }

    #[must_use]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn subscribe(&mut self, observer: impl AbacusObserver + 'static) {
        self.abacus.subscribe(observer);
    }

    #[must_use]
    pub fn value(&self) -> u128 {
        self.abacus.value()
    }

    pub fn set_value(&mut self, value: u128) -> Result<()> {
        self.write(|abacus| abacus.set_value(value))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.write(Abacus::clear)
    }

    pub fn set_digit(&mut self, rod: usize, digit: u8) -> Result<()> {
        self.write(|abacus| abacus.set_digit(rod, digit))
    }

    pub fn add(&mut self, delta: u128) -> Result<u128> {
        self.write(|abacus| abacus.add(delta))
    }

    pub fn subtract(&mut self, delta: u128) -> Result<u128> {
        self.write(|abacus| abacus.subtract(delta))
    }

    /// Rebuild for a new configuration. The layout is reset to the default
    /// for the new geometry.
    pub fn reconfigure(&mut self, config: AbacusConfig) -> Result<()> {
        self.abacus.reconfigure(config)?;
        self.controller
            .set_layout(FrameLayout::for_abacus(&self.abacus));
        self.controller.sync(&self.abacus);
        Ok(())
    }

    /// Forward one pointer event.
    pub fn pointer(&mut self, event: &PointerEvent) -> Vec<Interaction> {
        self.controller.process(&mut self.abacus, event)
    }

    /// Advance animated transitions.
    pub fn tick(&mut self, dt: Duration) {
        self.controller.tick(dt);
    }

    /// Where to draw each bead right now.
    #[must_use]
    pub fn displayed(&self) -> Vec<(BeadId, Rect)> {
        let layout = self.controller.layout();
        self.abacus
            .snapshot()
            .into_iter()
            .map(|bead| {
                let offset = self
                    .controller
                    .displayed_offset(bead.id)
                    .unwrap_or(bead.offset);
                (bead.id, layout.bead_rect(bead.id, offset))
            })
            .collect()
    }

    fn write<T>(&mut self, op: impl FnOnce(&mut Abacus) -> Result<T>) -> Result<T> {
        let out = op(&mut self.abacus)?;
        self.controller.sync(&self.abacus);
        Ok(out)
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Abacus, AbacusConfig, AbacusError, AbacusObserver, BeadId, Error, FrameLayout,
        Interaction, PointerEvent, Result, Role, Soroban, ValueChange,
    };

    pub use crate::{core, model, widgets};
}

pub use soroban_core as core;
pub use soroban_model as model;
pub use soroban_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_resync_transitions() {
        let mut frame = Soroban::new(AbacusConfig::with_rods(2)).unwrap();
        frame.set_value(5).unwrap();
        assert!(!frame.controller().transitions().is_settled());
        for _ in 0..300 {
            frame.tick(Duration::from_millis(16));
        }
        assert!(frame.controller().transitions().is_settled());
    }

    #[test]
    fn displayed_rects_cover_every_bead() {
        let frame = Soroban::new(AbacusConfig::with_rods(3)).unwrap();
        let rects = frame.displayed();
        assert_eq!(rects.len(), 3 * (1 + LIGHT_BEADS));
        let bounds = frame.controller().layout().bounds();
        for (id, rect) in rects {
            assert!(bounds.contains(rect.center()), "{id:?} drawn outside frame");
        }
    }

    #[test]
    fn pointer_round_trip() {
        let mut frame = Soroban::new(AbacusConfig::with_rods(1)).unwrap();
        let heavy = frame
            .displayed()
            .into_iter()
            .find(|(id, _)| *id == BeadId::heavy(0))
            .map(|(_, rect)| rect.center())
            .unwrap();
        frame.pointer(&PointerEvent::down(heavy.x, heavy.y));
        let out = frame.pointer(&PointerEvent::up(heavy.x, heavy.y));
        assert!(matches!(out[0], Interaction::Toggled(ch) if ch.value == 5));
        assert_eq!(frame.value(), 5);
    }

    #[test]
    fn reconfigure_resets_layout() {
        let mut frame = Soroban::new(AbacusConfig::with_rods(2)).unwrap();
        frame.set_value(42).unwrap();
        frame.reconfigure(AbacusConfig::with_rods(4)).unwrap();
        assert_eq!(frame.controller().layout().rods(), 4);
        assert_eq!(frame.value(), 42);
        assert!(matches!(
            frame.set_value(10_000),
            Err(AbacusError::ValueOutOfRange { .. })
        ));
    }
}
