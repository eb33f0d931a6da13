#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) used to glide beads between offsets.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Invariants
//!
//! 1. A spring at rest reports exactly its target from [`Spring::position`].
//! 2. [`Spring::set_target`] keeps position and velocity, so a superseding
//!    target continues smoothly from wherever the bead currently is.
//! 3. [`Animation::finish`] lands on the target with zero velocity.
//! 4. Stiffness is always positive and damping non-negative.
//!
//! # Failure Modes
//!
//! - Very large dt is subdivided into steps of at most 4ms.
//! - Zero damping never settles; callers that need termination use
//!   [`Animation::finish`].

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring is "at rest", in offset units.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Velocity (units/sec) below which the spring is "at rest".
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.05;

const MIN_STIFFNESS: f64 = 0.1;

/// A spring driving one scalar offset toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading to `target`.
    ///
    /// Defaults: stiffness 170, damping 26 (slightly underdamped).
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: (initial - target).abs() < DEFAULT_REST_THRESHOLD,
        }
        .settle_if_at_rest()
    }

    /// Critically damped spring with the given stiffness: no overshoot.
    #[must_use]
    pub fn critical(initial: f64, target: f64, stiffness: f64) -> Self {
        let k = stiffness.max(MIN_STIFFNESS);
        Self::new(initial, target)
            .with_stiffness(k)
            .with_damping(2.0 * k.sqrt())
    }

    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    fn settle_if_at_rest(mut self) -> Self {
        if self.at_rest {
            self.position = self.target;
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Change the target, keeping current position and velocity.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        if (self.position - target).abs() >= self.rest_threshold || self.velocity != 0.0 {
            self.at_rest = false;
        } else {
            self.position = target;
            self.at_rest = true;
        }
    }

    fn step(&mut self, dt: f64) {
        // Semi-implicit Euler.
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn finish(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn simulate(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.tick(MS_16);
        }
    }

    #[test]
    fn spring_reaches_target() {
        let mut spring = Spring::new(0.0, 24.0);
        simulate(&mut spring, 200);
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 24.0);
    }

    #[test]
    fn initial_equals_target_is_at_rest() {
        let spring = Spring::new(12.0, 12.0);
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 12.0);
    }

    #[test]
    fn critical_spring_does_not_overshoot() {
        let mut spring = Spring::critical(0.0, 10.0, 300.0);
        let mut max_pos = 0.0_f64;
        for _ in 0..300 {
            spring.tick(MS_16);
            max_pos = max_pos.max(spring.position());
        }
        assert!(max_pos <= 10.0 + 0.05, "overshoot: {max_pos}");
        assert!(spring.is_complete());
    }

    #[test]
    fn retarget_continues_from_current_position() {
        let mut spring = Spring::critical(0.0, 20.0, 170.0);
        simulate(&mut spring, 5);
        let mid = spring.position();
        assert!(mid > 0.0 && mid < 20.0);

        spring.set_target(0.0);
        assert_eq!(spring.position(), mid);
        assert!(!spring.is_complete());

        simulate(&mut spring, 300);
        assert_eq!(spring.position(), 0.0);
    }

    #[test]
    fn finish_lands_on_target() {
        let mut spring = Spring::new(0.0, 18.0);
        spring.tick(MS_16);
        spring.finish();
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 18.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn large_dt_subdivided() {
        let mut spring = Spring::critical(0.0, 5.0, 400.0);
        spring.tick(Duration::from_secs(5));
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 5.0);
    }

    #[test]
    fn parameters_clamped() {
        let spring = Spring::new(0.0, 1.0)
            .with_stiffness(-5.0)
            .with_damping(-1.0);
        assert!(spring.stiffness > 0.0);
        assert_eq!(spring.damping, 0.0);
    }

    #[test]
    fn set_target_to_current_position_stays_at_rest() {
        let mut spring = Spring::new(4.0, 4.0);
        spring.set_target(4.0);
        assert!(spring.is_complete());
    }
}
