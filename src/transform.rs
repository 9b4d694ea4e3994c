//! Viewport transform state for the scene layer.
//!
//! [`Transform`] is the pan + uniform scale written to the layer. [`Viewport`]
//! owns the current transform plus at most one in-flight [`Tween`]. Starting
//! a tween always kills the previous one, so the layer never has two writers,
//! and a killed tween's completion is dropped with it.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::geom::{Affine, Point};
use crate::tween::{Completion, Ease, Tween, TweenId};

/// Pan/zoom applied to the scene layer, origin at the layer's (0, 0).
///
/// `x` / `y` are in scene units. `scale` is positive (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

impl Transform {
    #[must_use]
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    /// Same scale, different pan.
    #[must_use]
    pub fn with_pan(&self, pan: Point) -> Self {
        Self { x: pan.x, y: pan.y, scale: self.scale }
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate_scale(self.x, self.y, self.scale)
    }

    /// Componentwise interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(&self, other: &Transform, t: f64) -> Transform {
        Transform {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

/// Result of advancing the viewport by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Transform to write to the layer this frame.
    pub transform: Transform,
    /// Set on the frame the tween lands.
    pub completed: Option<Completion>,
}

/// Current layer transform plus the single tween slot.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    current: Transform,
    tween: Option<Tween>,
    next_id: u64,
}

impl Viewport {
    #[must_use]
    pub fn new(initial: Transform) -> Self {
        Self { current: initial, tween: None, next_id: 0 }
    }

    /// The last transform written to the layer.
    #[must_use]
    pub fn current(&self) -> Transform {
        self.current
    }

    /// Whether a tween is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    #[cfg(test)]
    pub(crate) fn tween(&self) -> Option<&Tween> {
        self.tween.as_ref()
    }

    /// Number of live tweens on the layer. Always 0 or 1.
    #[must_use]
    pub fn active_tween_count(&self) -> usize {
        usize::from(self.tween.is_some())
    }

    /// Kill any tween and jump straight to `target`.
    pub fn set_immediately(&mut self, target: Transform) {
        self.tween = None;
        self.current = target;
    }

    /// Kill any tween without moving.
    pub fn kill(&mut self) {
        self.tween = None;
    }

    /// Kill any tween and start a new one from the current transform.
    pub fn animate_to(&mut self, target: Transform, duration_ms: f64, ease: Ease, now_ms: f64, completion: Completion) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tween = Some(Tween {
            id,
            from: self.current,
            to: target,
            start_ms: now_ms,
            duration_ms,
            ease,
            completion,
        });
        id
    }

    /// Advance the in-flight tween to `now_ms`.
    ///
    /// Returns `None` when nothing is animating.
    pub fn step(&mut self, now_ms: f64) -> Option<Step> {
        let tween = self.tween?;
        self.current = tween.sample(now_ms);
        if tween.is_finished(now_ms) {
            self.tween = None;
            return Some(Step { transform: self.current, completed: Some(tween.completion) });
        }
        Some(Step { transform: self.current, completed: None })
    }
}
