#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The host is expected to unify mouse, pen and touch input into this single
//! stream and to translate coordinates into the widget's local space before
//! handing events over.
//!
//! # Design Notes
//!
//! - Only one pointer is tracked; a `Down` while another pointer is held is
//!   the host's problem to filter.
//! - `Cancel` is distinct from `Up` so consumers can log it, but both end the
//!   gesture the same way.

use crate::geometry::Point;

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Primary button pressed (or touch began).
    Down,

    /// Pointer moved. Reported with or without a held button.
    Move,

    /// Primary button released (or touch ended).
    Up,

    /// The platform aborted the interaction (focus loss, touch cancel).
    Cancel,
}

/// A pointer event in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    /// Cancel carries no meaningful position; the last known one is reused.
    #[must_use]
    pub const fn cancel(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Cancel, x, y)
    }

    /// Get the position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
