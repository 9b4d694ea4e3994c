//! Easing curves, a single time-based transform tween, and the frame clock
//! shared by everything that moves per frame.

#[cfg(test)]
#[path = "tween_test.rs"]
mod tween_test;

use crate::consts::{LAG_ADJUSTED_SEC, LAG_THRESHOLD_SEC};
use crate::transform::Transform;

/// Easing curve applied to normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    /// Quadratic ease-in-out.
    Power1InOut,
    /// Cubic ease-out.
    Power2Out,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// What the engine should do once a tween lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The zoom toward this region has settled.
    ZoomedIn(crate::region::RegionId),
    /// The zoom back to the idle frame has settled.
    ResetDone,
}

/// Identity of a started tween. Never reused within one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenId(pub u64);

/// An in-flight interpolation between two transforms.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub id: TweenId,
    pub from: Transform,
    pub to: Transform,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
    pub completion: Completion,
}

impl Tween {
    /// Linear progress at `now_ms`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Interpolated transform at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> Transform {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, self.ease.apply(t))
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Per-frame delta time with lag smoothing.
///
/// A gap longer than [`LAG_THRESHOLD_SEC`] (a background tab, a debugger
/// pause) counts as one [`LAG_ADJUSTED_SEC`] frame so nothing jumps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_frame_at: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous call; zero on the first frame.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_frame_at {
            Some(prev) => ((now_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_frame_at = Some(now_ms);
        if dt > LAG_THRESHOLD_SEC { LAG_ADJUSTED_SEC } else { dt }
    }
}
