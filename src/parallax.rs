//! Idle parallax: the map leans away from the cursor and drifts gently when
//! the pointer rests, while nothing is hovered.
//!
//! The offset is blended toward its target with frame-rate independent
//! exponential smoothing (`alpha = 1 − exp(−dt/τ)`). After any stop the
//! engine stays asleep until the pointer moves past the wake threshold, so a
//! reset never ends in a visible snap.

#[cfg(test)]
#[path = "parallax_test.rs"]
mod parallax_test;

use std::f64::consts::TAU;

use crate::config::Tuning;
use crate::geom::{Point, ViewBox};
use crate::tween::FrameClock;

/// Smoothed parallax offset plus the pointer bookkeeping that drives it.
#[derive(Debug, Clone)]
pub struct Parallax {
    current: Point,
    target: Point,
    asleep: bool,
    last_pointer: Option<Point>,
    last_move_at: f64,
    clock: FrameClock,
}

impl Default for Parallax {
    fn default() -> Self {
        Self {
            current: Point::default(),
            target: Point::default(),
            asleep: true,
            last_pointer: None,
            last_move_at: 0.0,
            clock: FrameClock::default(),
        }
    }
}

impl Parallax {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Point {
        self.current
    }

    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Whether parallax is waiting for the pointer to move.
    #[must_use]
    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    /// Zero the offset and sleep until the next real pointer move.
    pub fn stop(&mut self) {
        self.current = Point::default();
        self.target = Point::default();
        self.asleep = true;
    }

    /// Note a pointer sample. Wakes parallax once the pointer has moved at
    /// least `wake_px` since the previous sample.
    pub fn observe_pointer(&mut self, client: Point, now_ms: f64, wake_px: f64) {
        if let Some(prev) = self.last_pointer {
            if client.distance_to(prev) >= wake_px {
                self.asleep = false;
            }
        }
        self.last_move_at = now_ms;
        self.last_pointer = Some(client);
    }

    /// Aim at the inverse of the pointer's displacement from the view center,
    /// scaled by the strength and capped per axis.
    pub fn aim(&mut self, anchor: Point, view_box: &ViewBox, tuning: &Tuning) {
        let center = view_box.center();
        let cap = tuning.parallax_max_px;
        let lean = |d: f64| (-d * tuning.parallax_strength).max(-cap).min(cap);
        self.target = Point::new(lean(anchor.x - center.x), lean(anchor.y - center.y));
    }

    /// Ambient float for frame time `now_ms`, or zero while the pointer is
    /// still moving.
    #[must_use]
    pub fn float_offset(&self, now_ms: f64, tuning: &Tuning) -> Point {
        if now_ms - self.last_move_at <= tuning.parallax_idle_delay_ms {
            return Point::default();
        }
        let t = now_ms / 1000.0;
        let period = tuning.parallax_float_sec;
        let amp = tuning.parallax_float_px;
        Point::new((t * TAU / period).sin() * amp, (t * TAU / (period * 1.3)).cos() * (amp * 0.8))
    }

    /// Advance one frame. Every frame must pass through here so `dt` stays
    /// honest; `enabled` is false while a region is active or a tween runs.
    ///
    /// Returns the new offset when parallax is running, `None` otherwise.
    pub fn step(&mut self, now_ms: f64, enabled: bool, tuning: &Tuning) -> Option<Point> {
        let dt = self.clock.advance(now_ms);
        if !enabled || self.asleep {
            return None;
        }

        let float = self.float_offset(now_ms, tuning);
        let goal = Point::new(self.target.x + float.x, self.target.y + float.y);
        let alpha = 1.0 - (-dt / tuning.parallax_tau_sec.max(0.001)).exp();

        self.current.x += (goal.x - self.current.x) * alpha;
        self.current.y += (goal.y - self.current.y) * alpha;
        Some(self.current)
    }
}
