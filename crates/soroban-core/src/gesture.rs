#![forbid(unsafe_code)]

//! Drag recognition: turns a raw pointer stream into drag lifecycle events.
//!
//! [`DragRecognizer`] is a small stateful processor. Feed it every
//! [`PointerEvent`] and it reports [`DragEvent`]s.
//!
//! # State Machine
//!
//! ```text
//!            Down                 Move >= threshold
//!   Idle ─────────────► Armed ─────────────────────► Dragging
//!    ▲                    │ Up (Tap)                   │ Up (DragEnd)
//!    │                    │ Cancel (nothing)           │ Cancel (DragCancel)
//!    └────────────────────┴────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Every drag sequence is well-formed: `DragStart` → zero or more
//!    `DragMove` → exactly one of `DragEnd` or `DragCancel`.
//! 2. `Tap` and `DragEnd` never both emit for the same down → up interaction.
//! 3. After [`reset`](DragRecognizer::reset) the recognizer is idle and emits
//!    nothing for a trailing `Up`.
//! 4. A `Down` arriving mid-drag cancels the open drag before arming again.

use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::Point;

/// Thresholds for drag recognition.
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// Minimum manhattan distance before a drag starts (default: 3.0).
    pub drag_threshold: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
        }
    }
}

/// Drag lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pointer went down and was released without passing the threshold.
    Tap { pos: Point },
    /// Movement passed the threshold. `start` is the original down position.
    DragStart { start: Point },
    /// Pointer moved during a drag. `delta` is relative to the previous sample.
    DragMove {
        start: Point,
        current: Point,
        delta: (f64, f64),
    },
    /// Pointer released during a drag.
    DragEnd { start: Point, end: Point },
    /// Drag aborted by the platform.
    DragCancel,
}

#[derive(Debug, Clone)]
struct DragTracker {
    start_pos: Point,
    last_pos: Point,
    started: bool,
}

/// Stateful drag recognizer.
#[derive(Debug, Clone, Default)]
pub struct DragRecognizer {
    config: DragConfig,
    drag: Option<DragTracker>,
}

impl DragRecognizer {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self { config, drag: None }
    }

    /// Process a pointer event, returning any drag events produced.
    ///
    /// A move that crosses the threshold yields both `DragStart` and the
    /// first `DragMove`.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<DragEvent> {
        let mut out = Vec::with_capacity(2);
        let pos = event.position();

        match event.kind {
            PointerEventKind::Down => {
                // A second down without an up: close the dangling drag first.
                if let Some(drag) = self.drag.take()
                    && drag.started
                {
                    out.push(DragEvent::DragCancel);
                }
                self.drag = Some(DragTracker {
                    start_pos: pos,
                    last_pos: pos,
                    started: false,
                });
            }
            PointerEventKind::Move => self.on_move(pos, &mut out),
            PointerEventKind::Up => {
                if let Some(drag) = self.drag.take() {
                    if drag.started {
                        out.push(DragEvent::DragEnd {
                            start: drag.start_pos,
                            end: pos,
                        });
                    } else {
                        out.push(DragEvent::Tap {
                            pos: drag.start_pos,
                        });
                    }
                }
            }
            PointerEventKind::Cancel => {
                if let Some(drag) = self.drag.take()
                    && drag.started
                {
                    out.push(DragEvent::DragCancel);
                }
            }
        }

        #[cfg(feature = "tracing")]
        for ev in &out {
            tracing::trace!(event = ?ev, "drag recognizer");
        }

        out
    }

    fn on_move(&mut self, pos: Point, out: &mut Vec<DragEvent>) {
        // Hover without a held pointer.
        let Some(ref mut drag) = self.drag else {
            return;
        };

        if !drag.started && drag.start_pos.manhattan_distance(pos) >= self.config.drag_threshold {
            drag.started = true;
            out.push(DragEvent::DragStart {
                start: drag.start_pos,
            });
        }

        if drag.started {
            out.push(DragEvent::DragMove {
                start: drag.start_pos,
                current: pos,
                delta: (pos.x - drag.last_pos.x, pos.y - drag.last_pos.y),
            });
        }

        drag.last_pos = pos;
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.started)
    }

    /// Whether the pointer is held (armed or dragging).
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.drag.is_some()
    }

    /// Reset to idle without emitting anything.
    pub fn reset(&mut self) {
        self.drag = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> DragRecognizer {
        DragRecognizer::new(DragConfig::default())
    }

    #[test]
    fn tap_without_movement() {
        let mut dr = recognizer();
        assert!(dr.process(&PointerEvent::down(5.0, 5.0)).is_empty());
        let events = dr.process(&PointerEvent::up(5.0, 5.0));
        assert_eq!(
            events,
            vec![DragEvent::Tap {
                pos: Point::new(5.0, 5.0)
            }]
        );
    }

    #[test]
    fn small_jitter_is_still_a_tap() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(5.0, 5.0));
        assert!(dr.process(&PointerEvent::moved(6.0, 6.0)).is_empty());
        assert!(!dr.is_dragging());
        let events = dr.process(&PointerEvent::up(6.0, 6.0));
        assert!(matches!(events[0], DragEvent::Tap { .. }));
    }

    #[test]
    fn drag_starts_after_threshold() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(5.0, 5.0));
        let events = dr.process(&PointerEvent::moved(5.0, 9.0));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            DragEvent::DragStart {
                start: Point::new(5.0, 5.0)
            }
        );
        assert!(matches!(
            events[1],
            DragEvent::DragMove {
                delta: (0.0, 4.0),
                ..
            }
        ));
        assert!(dr.is_dragging());
    }

    #[test]
    fn drag_move_delta_is_incremental() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        dr.process(&PointerEvent::moved(0.0, 10.0));
        let events = dr.process(&PointerEvent::moved(0.0, 12.5));
        assert_eq!(
            events,
            vec![DragEvent::DragMove {
                start: Point::new(0.0, 0.0),
                current: Point::new(0.0, 12.5),
                delta: (0.0, 2.5),
            }]
        );
    }

    #[test]
    fn drag_end_on_up() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        dr.process(&PointerEvent::moved(0.0, 10.0));
        let events = dr.process(&PointerEvent::up(0.0, 11.0));
        assert_eq!(
            events,
            vec![DragEvent::DragEnd {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 11.0),
            }]
        );
        assert!(!dr.is_pressed());
    }

    #[test]
    fn cancel_during_drag() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        dr.process(&PointerEvent::moved(10.0, 0.0));
        assert_eq!(
            dr.process(&PointerEvent::cancel(10.0, 0.0)),
            vec![DragEvent::DragCancel]
        );
    }

    #[test]
    fn cancel_before_threshold_is_silent() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        assert!(dr.process(&PointerEvent::cancel(0.0, 0.0)).is_empty());
    }

    #[test]
    fn second_down_cancels_open_drag() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        dr.process(&PointerEvent::moved(10.0, 0.0));
        assert_eq!(
            dr.process(&PointerEvent::down(3.0, 3.0)),
            vec![DragEvent::DragCancel]
        );
        assert!(dr.is_pressed());
        assert!(!dr.is_dragging());
    }

    #[test]
    fn hover_move_ignored() {
        let mut dr = recognizer();
        assert!(dr.process(&PointerEvent::moved(50.0, 50.0)).is_empty());
        assert!(dr.process(&PointerEvent::up(50.0, 50.0)).is_empty());
    }

    #[test]
    fn reset_drops_tracker() {
        let mut dr = recognizer();
        dr.process(&PointerEvent::down(0.0, 0.0));
        dr.process(&PointerEvent::moved(10.0, 0.0));
        dr.reset();
        assert!(!dr.is_dragging());
        assert!(dr.process(&PointerEvent::up(10.0, 0.0)).is_empty());
    }

    #[test]
    fn zero_threshold_drags_on_first_move() {
        let mut dr = DragRecognizer::new(DragConfig {
            drag_threshold: 0.0,
        });
        dr.process(&PointerEvent::down(1.0, 1.0));
        let events = dr.process(&PointerEvent::moved(1.0, 1.5));
        assert!(matches!(events[0], DragEvent::DragStart { .. }));
    }
}
