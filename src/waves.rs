//! Decorative wave drift.
//!
//! Every wave is drawn twice: tile A and a clone B that starts one tile
//! behind it. Both slide right at the wave's speed and wrap over
//! `[-tile_w, tile_w)`, fading out near either end. Each time B wraps it
//! moves to a new vertical lane, picked so that no two clones share a lane
//! while a free one exists.

#[cfg(test)]
#[path = "waves_test.rs"]
mod waves_test;

use std::collections::{BTreeMap, BTreeSet};

use crate::consts::*;
use crate::tween::FrameClock;

/// Deterministic pseudo-random value in `[0, 1)` for seed `n`.
#[must_use]
pub fn hash01(n: f64) -> f64 {
    let x = ((n + 1.0) * 999.0).sin() * 10000.0;
    x - x.floor()
}

/// Wrap `x` into `[min, max)`.
#[must_use]
pub fn wrap(x: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    min + (x - min).rem_euclid(range)
}

/// Edge fade over a tile's travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    left: f64,
    right: f64,
    fade_px: f64,
    dead_px: f64,
}

impl Fade {
    /// `visible_left` / `visible_right` narrow the window on each side as a
    /// fraction of `tile_w`, never below 5%.
    #[must_use]
    pub fn new(tile_w: f64, fade_px: f64, dead_px: f64, visible_left: f64, visible_right: f64) -> Self {
        Self {
            left: -tile_w * visible_left.clamp(0.05, 1.0),
            right: tile_w * visible_right.clamp(0.05, 1.0),
            fade_px,
            dead_px,
        }
    }

    /// Zero inside the dead margins, a linear ramp across the fade band,
    /// one in between.
    #[must_use]
    pub fn opacity_at(&self, x: f64) -> f64 {
        let lo = self.left + self.dead_px;
        let hi = self.right - self.dead_px;
        if x <= lo || x >= hi {
            return 0.0;
        }
        if x < lo + self.fade_px {
            return ((x - lo) / self.fade_px).clamp(0.0, 1.0);
        }
        if x > hi - self.fade_px {
            return ((hi - x) / self.fade_px).clamp(0.0, 1.0);
        }
        1.0
    }
}

/// Tile width, speed and fade of one wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpec {
    pub tile_w: f64,
    /// Scene units per second.
    pub speed: f64,
    pub fade: Fade,
}

impl TileSpec {
    /// Geometry for the wave at `index` whose measured width is `width`.
    /// The longest waves get a shorter tile and a narrower visible window.
    #[must_use]
    pub fn new(width: f64, longest: bool, index: usize) -> Self {
        let raw = (width + WAVE_WIDTH_PAD).max(1.0);
        let target = if longest { WAVE_TILE_W_LONGEST } else { WAVE_TILE_W };
        let overlap = (raw - target).max(WAVE_OVERLAP_MIN).min(raw * WAVE_OVERLAP_MAX_RATIO);
        let tile_w = (raw - overlap).max(1.0);

        let (dead, fade) = if longest { (WAVE_LONG_DEAD_PX, WAVE_LONG_FADE_PX) } else { (WAVE_DEAD_PX, WAVE_FADE_PX) };
        let mut dead_px = dead.min(tile_w * 0.15);
        let mut fade_px = fade.min(tile_w * 0.35);
        let max_span = tile_w * 0.9;
        if dead_px + fade_px > max_span {
            fade_px = (max_span - dead_px).max(WAVE_MIN_FADE_PX);
            if dead_px + fade_px > max_span {
                dead_px = (max_span - fade_px).max(0.0);
            }
        }
        let fade_px = fade_px.max(WAVE_MIN_FADE_PX);

        let (visible_left, visible_right) = if longest { (WAVE_LONG_VISIBLE_LEFT, WAVE_LONG_VISIBLE_RIGHT) } else { (1.0, 1.0) };

        let jitter = hash01(index_value(index) + 77.0) - 0.5;
        let loop_sec = (WAVE_LOOP_SEC_BASE + jitter * WAVE_LOOP_SEC_VAR * 2.0).clamp(WAVE_LOOP_SEC_MIN, WAVE_LOOP_SEC_MAX);
        let speed = (tile_w / loop_sec).clamp(WAVE_SPEED_MIN, WAVE_SPEED_MAX);

        Self { tile_w, speed, fade: Fade::new(tile_w, fade_px, dead_px, visible_left, visible_right) }
    }
}

/// Indices of the `count` widest waves, ignoring unmeasured and zero widths.
/// Ties keep document order.
#[must_use]
pub fn longest_indices(widths: &[Option<f64>], count: usize) -> BTreeSet<usize> {
    let mut measured: Vec<(usize, f64)> = widths
        .iter()
        .enumerate()
        .filter_map(|(i, w)| w.filter(|w| *w > 0.0).map(|w| (i, w)))
        .collect();
    measured.sort_by(|a, b| b.1.total_cmp(&a.1));
    measured.into_iter().take(count).map(|(i, _)| i).collect()
}

/// Which lane each wave's clone currently holds.
#[derive(Debug, Clone, Default)]
pub struct LaneBook {
    lanes: usize,
    current: BTreeMap<usize, usize>,
}

impl LaneBook {
    #[must_use]
    pub fn new(lanes: usize) -> Self {
        Self { lanes, current: BTreeMap::new() }
    }

    #[must_use]
    pub fn lane_of(&self, wave: usize) -> Option<usize> {
        self.current.get(&wave).copied()
    }

    pub fn assign(&mut self, wave: usize, lane: usize) {
        self.current.insert(wave, lane);
    }

    /// A new lane for `wave`, advancing `seed` with every draw.
    ///
    /// Never returns `last` when more than one lane exists. Lanes held by
    /// other waves are avoided for the first round of draws; after that any
    /// lane but `last` will do.
    pub fn pick(&self, seed: &mut f64, last: usize, wave: usize) -> usize {
        let mut busy: BTreeSet<usize> = self.current.values().copied().collect();
        busy.remove(&last);
        if let Some(own) = self.lane_of(wave) {
            busy.remove(&own);
        }

        for _ in 0..WAVE_LANE_TRIES {
            let lane = self.draw(seed);
            if lane != last && !busy.contains(&lane) {
                return lane;
            }
        }
        for _ in 0..WAVE_LANE_TRIES {
            let lane = self.draw(seed);
            if lane != last {
                return lane;
            }
        }
        0
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn draw(&self, seed: &mut f64) -> usize {
        *seed += 17.0;
        let lane = (hash01(*seed) * self.lanes as f64).floor() as usize;
        lane.min(self.lanes.saturating_sub(1))
    }
}

/// Placement of one wave pair for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveFrame {
    pub a_x: f64,
    pub a_opacity: f64,
    pub b_x: f64,
    pub b_y: f64,
    pub b_opacity: f64,
}

#[derive(Debug, Clone)]
struct Wave {
    slot: usize,
    spec: TileSpec,
    start_ms: f64,
    a_x: f64,
    b_x: f64,
    lane: usize,
    seed: f64,
}

impl Wave {
    fn frame(&self) -> WaveFrame {
        WaveFrame {
            a_x: self.a_x,
            a_opacity: self.spec.fade.opacity_at(self.a_x),
            b_x: self.b_x,
            b_y: lane_offset(self.lane),
            b_opacity: self.spec.fade.opacity_at(self.b_x),
        }
    }
}

/// Every wave of a scene, stepped from the frame clock.
#[derive(Debug, Clone)]
pub struct Waves {
    waves: Vec<Wave>,
    lanes: LaneBook,
    clock: FrameClock,
}

impl Waves {
    /// Lay out one pair per measured width, in document order. `None` marks
    /// a wave that is left alone. Wave `i` starts moving
    /// `i × WAVE_STAGGER_MS` after `now_ms`.
    #[must_use]
    pub fn new(widths: &[Option<f64>], now_ms: f64) -> Self {
        let longest = longest_indices(widths, WAVE_LONGEST_COUNT);
        let mut lanes = LaneBook::new(WAVE_LANES.len());
        let mut waves = Vec::new();

        for (slot, width) in widths.iter().enumerate() {
            let Some(width) = width else {
                continue;
            };
            let spec = TileSpec::new(*width, longest.contains(&slot), slot);
            let mut seed = index_value(slot) * 1000.0 + 333.0;

            let initial = slot % WAVE_LANES.len();
            lanes.assign(slot, initial);
            let lane = lanes.pick(&mut seed, initial, slot);
            lanes.assign(slot, lane);

            waves.push(Wave {
                slot,
                spec,
                start_ms: now_ms + index_value(slot) * WAVE_STAGGER_MS,
                a_x: 0.0,
                b_x: -spec.tile_w,
                lane,
                seed,
            });
        }
        Self { waves, lanes, clock: FrameClock::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Starting placement: A in place and opaque, B one tile behind and hidden.
    #[must_use]
    pub fn initial_frames(&self) -> Vec<(usize, WaveFrame)> {
        self.waves
            .iter()
            .map(|w| {
                let frame = WaveFrame { a_x: w.a_x, a_opacity: 1.0, b_x: w.b_x, b_y: lane_offset(w.lane), b_opacity: 0.0 };
                (w.slot, frame)
            })
            .collect()
    }

    /// Advance every wave whose start time has passed, returning the new
    /// placement per slot.
    pub fn tick(&mut self, now_ms: f64) -> Vec<(usize, WaveFrame)> {
        let dt = self.clock.advance(now_ms);
        let mut frames = Vec::new();
        for wave in &mut self.waves {
            if now_ms < wave.start_ms {
                continue;
            }
            let tile = wave.spec.tile_w;
            let dx = wave.spec.speed * dt;
            let prev_b = wave.b_x;
            wave.a_x = wrap(wave.a_x + dx, -tile, tile);
            wave.b_x = wrap(wave.b_x + dx, -tile, tile);

            if prev_b > tile * 0.75 && wave.b_x < -tile * 0.75 {
                wave.lane = self.lanes.pick(&mut wave.seed, wave.lane, wave.slot);
                self.lanes.assign(wave.slot, wave.lane);
            }
            frames.push((wave.slot, wave.frame()));
        }
        frames
    }
}

fn lane_offset(lane: usize) -> f64 {
    WAVE_LANES.get(lane).copied().unwrap_or_default()
}

fn index_value(i: usize) -> f64 {
    u32::try_from(i).map_or(f64::MAX, f64::from)
}
