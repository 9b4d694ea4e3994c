//! Hover stability controller.
//!
//! Decides which region is active, once per frame, from the latest pointer
//! sample. Three rules keep the zoom from flickering along shared borders:
//!
//! - **switch guard**: a different region is only accepted after the pointer
//!   has travelled `sticky_px` from the last accepted switch *and*
//!   `switch_cooldown_ms` has passed since it;
//! - **in-flight guard**: while a tween runs, a different region is ignored
//!   until it settles;
//! - **forgiveness**: a pointer that falls off every region but stays inside
//!   the active region's padded bbox keeps the region.
//!
//! Anything else schedules a reset through the single-slot [`ResetTimer`].
//! The controller only holds state and makes decisions; the engine performs
//! the resulting transitions.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use crate::config::Tuning;
use crate::geom::Point;
use crate::input::PointerSample;
use crate::region::RegionId;

/// Lifecycle of the active region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing active; the idle frame (and parallax) owns the layer.
    #[default]
    Idle,
    /// Tweening toward this region.
    Entering(RegionId),
    /// Zoomed in and static.
    Settled(RegionId),
    /// Tweening back to the idle frame.
    Resetting,
}

/// Outcome of evaluating one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep everything as is this frame.
    Hold,
    /// Cancel any pending reset and zoom to the region (no-op if already active).
    Enter(RegionId),
    /// Off every region but within the active one's forgiveness margin.
    Forgive,
    /// Off every region: schedule a reset.
    Leave,
}

/// Single-slot, cancellable deadline for a delayed reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResetTimer {
    deadline: Option<f64>,
}

impl ResetTimer {
    /// Replace any pending deadline. Returns `true` when `delay_ms` is zero or
    /// negative, meaning the reset should happen right now instead.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) -> bool {
        self.deadline = None;
        if delay_ms <= 0.0 {
            return true;
        }
        self.deadline = Some(now_ms + delay_ms);
        false
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clear and report the deadline if it has passed.
    pub fn take_due(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(at) if now_ms >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Active-region state plus the bookkeeping the guards need.
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    phase: Phase,
    last_switch_at: f64,
    last_switch_pos: Point,
    last_pointer: Option<Point>,
    pending: Option<PointerSample>,
    reset_timer: ResetTimer,
}

impl HoverController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active region, if any.
    #[must_use]
    pub fn active(&self) -> Option<RegionId> {
        match self.phase {
            Phase::Entering(id) | Phase::Settled(id) => Some(id),
            Phase::Idle | Phase::Resetting => None,
        }
    }

    // --- Pointer sampling ---

    /// Record a raw pointer move. Moves between frames collapse to the latest.
    pub fn queue_sample(&mut self, sample: PointerSample) {
        self.pending = Some(sample);
    }

    /// Take the sample queued since the last frame, remembering its position
    /// as the last known pointer.
    pub fn take_pending(&mut self) -> Option<PointerSample> {
        let sample = self.pending.take()?;
        self.last_pointer = Some(sample.client);
        Some(sample)
    }

    // --- Decisions ---

    /// Evaluate the pointer at `pointer` resolving to `hit`.
    ///
    /// `tweening` is whether any layer tween is in flight. `forgiven` is only
    /// called when the pointer is off every region while one is active; it
    /// reports whether the pointer is inside that region's padded bbox.
    pub fn decide<F>(&self, hit: Option<RegionId>, pointer: Point, now_ms: f64, tweening: bool, tuning: &Tuning, forgiven: F) -> Decision
    where
        F: FnOnce(RegionId) -> bool,
    {
        let active = self.active();
        match hit {
            Some(id) => {
                let switching = active.is_some_and(|a| a != id);
                if switching && tweening {
                    return Decision::Hold;
                }
                if switching && !self.switch_allowed(pointer, now_ms, tuning) {
                    return Decision::Hold;
                }
                Decision::Enter(id)
            }
            None => match active {
                Some(a) if forgiven(a) => Decision::Forgive,
                _ => Decision::Leave,
            },
        }
    }

    /// Whether the pointer has moved far enough, and enough time has passed,
    /// since the last accepted switch.
    #[must_use]
    pub fn switch_allowed(&self, pointer: Point, now_ms: f64, tuning: &Tuning) -> bool {
        let moved = pointer.distance_to(self.last_switch_pos);
        moved >= tuning.sticky_px && now_ms - self.last_switch_at >= tuning.switch_cooldown_ms
    }

    // --- Transitions ---

    /// Make `id` the active region and start entering it.
    ///
    /// Returns the previously active region. The switch time and position are
    /// recorded once any pointer position is known.
    pub fn activate(&mut self, id: RegionId, now_ms: f64) -> Option<RegionId> {
        let previous = self.active();
        self.phase = Phase::Entering(id);
        if let Some(pos) = self.last_pointer {
            self.last_switch_at = now_ms;
            self.last_switch_pos = pos;
        }
        previous
    }

    /// The zoom-in tween for `id` landed. Ignored if `id` is no longer entering.
    pub fn settle(&mut self, id: RegionId) -> bool {
        if self.phase == Phase::Entering(id) {
            self.phase = Phase::Settled(id);
            return true;
        }
        false
    }

    /// Drop the active region and start resetting. Returns the region that was
    /// active, or `None` (and no state change) if nothing was.
    pub fn clear(&mut self) -> Option<RegionId> {
        let previous = self.active()?;
        self.phase = Phase::Resetting;
        Some(previous)
    }

    /// The reset tween landed.
    pub fn finish_reset(&mut self) {
        if self.phase == Phase::Resetting {
            self.phase = Phase::Idle;
        }
    }

    // --- Reset timer ---

    pub fn reset_timer(&mut self) -> &mut ResetTimer {
        &mut self.reset_timer
    }

    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.reset_timer.is_pending()
    }
}
