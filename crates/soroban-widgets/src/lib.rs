#![forbid(unsafe_code)]

//! Interaction and presentation helpers for Soroban frames.

pub mod controller;
pub mod layout;
pub mod transition;

pub use controller::{Interaction, InteractionController};
pub use layout::FrameLayout;
pub use transition::BeadTransitions;
