#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Animations are advanced explicitly with [`Animation::tick`]; nothing here
//! owns a clock. That keeps every transition deterministic under test.

pub mod spring;

use std::time::Duration;

pub use spring::Spring;

/// A value that evolves over time toward completion.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Jump straight to the final state.
    fn finish(&mut self);
}
