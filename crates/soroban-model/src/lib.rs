#![forbid(unsafe_code)]

//! Bead model, value codec, collision resolver, and snap policy.
//!
//! A soroban rod holds one Heavy bead (worth 5) above the divider and four
//! Light beads (worth 1 each) below it. A bead is *active* when it rests
//! against the divider. This crate keeps that state authoritative:
//!
//! - [`Abacus`] owns every rod, runs the single-gesture state machine and
//!   notifies [`AbacusObserver`]s.
//! - [`resolver`] moves a dragged bead and pushes its neighbours without
//!   letting beads overlap or leave their zone.
//! - [`snap`] turns continuous offsets back into a canonical digit on release.
//! - [`codec`] maps values to per-rod digits and digits to bead patterns.
//!
//! # Example
//!
//! ```
//! use soroban_model::{Abacus, AbacusConfig, BeadId};
//!
//! let mut abacus = Abacus::new(AbacusConfig::with_rods(3)).unwrap();
//! abacus.set_value(509).unwrap();
//! assert_eq!(abacus.digits(), vec![5, 0, 9]);
//!
//! // Push the third Light bead of the ones rod home; it carries the two
//! // below it along.
//! abacus.clear().unwrap();
//! abacus.begin_drag(BeadId::light(2, 2)).unwrap();
//! abacus.drag_to(0.0);
//! let change = abacus.end_drag();
//! assert_eq!(change.value, 3);
//! ```

pub mod abacus;
pub mod bead;
pub mod codec;
pub mod config;
pub mod error;
pub mod observer;
pub mod resolver;
pub mod snap;

pub use abacus::{Abacus, BeadState, GesturePhase};
pub use bead::{Bead, BeadId, LIGHT_BEADS, Role, Rod, TravelGeometry};
pub use codec::{DigitPattern, HEAVY_WEIGHT};
pub use config::{AbacusConfig, ConfigError, MAX_RODS};
pub use error::AbacusError;
pub use observer::{AbacusObserver, BeadChange, ValueChange};
pub use resolver::BeadMove;
pub use snap::SnapPolicy;
