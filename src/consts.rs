//! Shared numeric constants for the map engine.
//!
//! These are the defaults behind [`crate::config::Tuning`]. Anything a page
//! may want to retune lives there; this module only names the numbers.

// ── Idle frame ──────────────────────────────────────────────────

/// Padding in scene units around the map when idle.
pub const BASE_PAD: f64 = 0.0;

/// Cover multiplier for the idle frame (>1 crops for a fuller frame).
pub const BASE_ZOOM: f64 = 1.5;

/// Idle-frame horizontal bias. Negative crops more of the west edge.
pub const BASE_BIAS_X: f64 = -150.0;

/// Idle-frame vertical bias. Negative crops more of the north edge.
pub const BASE_BIAS_Y: f64 = -100.0;

// ── Hover frame ─────────────────────────────────────────────────

/// Hover scale as a multiple of the base scale.
pub const HOVER_SCALE: f64 = 2.0;

/// Clamp padding while zoomed in.
pub const HOVER_PAD: f64 = 6.0;

/// Default horizontal bias applied to hover targets.
pub const HOVER_BIAS_X: f64 = 50.0;

/// Vertical bias applied to hover targets. Positive shifts the view down.
pub const HOVER_BIAS_Y: f64 = 0.0;

/// Default viewport anchor, as a fraction of the view box.
pub const HOVER_ANCHOR_FACTOR: f64 = 0.5;

// ── Tweens ──────────────────────────────────────────────────────

/// Zoom-in duration in milliseconds.
pub const DUR_IN_MS: f64 = 750.0;

/// Zoom-out duration in milliseconds.
pub const DUR_OUT_MS: f64 = 750.0;

/// Duration of the re-fit tween issued on resize while zoomed.
pub const DUR_RESIZE_MS: f64 = 350.0;

// ── Hover stability ─────────────────────────────────────────────

/// Pointer travel (CSS px) required before switching to another region.
pub const STICKY_PX: f64 = 18.0;

/// Minimum time between accepted region switches.
pub const SWITCH_COOLDOWN_MS: f64 = 220.0;

/// Padded hitbox around the active region, in scene units.
pub const HOVER_FORGIVE_PX: f64 = 90.0;

/// Delay before an off-region pointer resets the zoom. 0 resets at once.
pub const RESET_DELAY_MS: f64 = 0.0;

// ── Parallax ────────────────────────────────────────────────────

/// Inverse-follow strength (0.0 - 0.2 works well).
pub const PARALLAX_STRENGTH: f64 = 0.1;

/// Cap on the parallax offset per axis, in scene units.
pub const PARALLAX_MAX_PX: f64 = 100.0;

/// Smoothing time constant. Larger is floatier.
pub const PARALLAX_TAU_SEC: f64 = 0.45;

/// Amplitude of the ambient drift.
pub const PARALLAX_FLOAT_PX: f64 = 5.0;

/// Period of the ambient drift on the X axis.
pub const PARALLAX_FLOAT_SEC: f64 = 12.0;

/// Pointer stillness before the ambient drift kicks in.
pub const PARALLAX_IDLE_DELAY_MS: f64 = 200.0;

/// Minimum pointer move that wakes parallax after a reset.
pub const PARALLAX_WAKE_PX: f64 = 2.0;

/// Frame gaps longer than this are treated as a single short frame.
pub const LAG_THRESHOLD_SEC: f64 = 0.5;

/// Substitute frame time used after a lag spike.
pub const LAG_ADJUSTED_SEC: f64 = 0.033;

// ── Labels ──────────────────────────────────────────────────────

/// Horizontal overhang of the underline past the label rect, in CSS px.
pub const UNDERLINE_PAD_X: f64 = 1.5;

/// Gap between the label's bottom edge and the underline, in CSS px.
pub const UNDERLINE_OFFSET_Y: f64 = 0.5;

/// Smallest label/region client rect edge considered measurable.
pub const MIN_MEASURABLE_PX: f64 = 1.0;

// ── Waves ───────────────────────────────────────────────────────

/// Start delay between consecutive waves, in ms.
pub const WAVE_STAGGER_MS: f64 = 100.0;

/// Added to each measured wave width before tiling.
pub const WAVE_WIDTH_PAD: f64 = 2.0;

/// Loop period around which each wave's speed is varied, in seconds.
pub const WAVE_LOOP_SEC_BASE: f64 = 7.2;

/// Maximum deviation from the base loop period.
pub const WAVE_LOOP_SEC_VAR: f64 = 0.8;

pub const WAVE_LOOP_SEC_MIN: f64 = 6.0;
pub const WAVE_LOOP_SEC_MAX: f64 = 8.8;

/// Drift speed bounds in scene units per second.
pub const WAVE_SPEED_MIN: f64 = 7.0;
pub const WAVE_SPEED_MAX: f64 = 28.0;

/// Preferred tile width; wider waves overlap their clone.
pub const WAVE_TILE_W: f64 = 220.0;

/// Preferred tile width for the longest waves.
pub const WAVE_TILE_W_LONGEST: f64 = 140.0;

/// Least overlap between a wave and its clone.
pub const WAVE_OVERLAP_MIN: f64 = 10.0;

/// Most overlap, as a fraction of the padded width.
pub const WAVE_OVERLAP_MAX_RATIO: f64 = 0.8;

/// Fade ramp and fully transparent margin at each wrap edge.
pub const WAVE_FADE_PX: f64 = 90.0;
pub const WAVE_DEAD_PX: f64 = 22.0;

/// Shortest fade ramp ever used.
pub const WAVE_MIN_FADE_PX: f64 = 6.0;

/// Vertical offsets the clone tile can take, in scene units.
pub const WAVE_LANES: [f64; 13] = [-30.0, -24.0, -18.0, -12.0, -6.0, 0.0, 6.0, 12.0, 18.0, 24.0, 30.0, 36.0, 42.0];

/// How many of the widest waves get the shorter tile and narrower window.
pub const WAVE_LONGEST_COUNT: usize = 2;

/// Visible window of the longest waves, as fractions of the tile width.
pub const WAVE_LONG_VISIBLE_LEFT: f64 = 0.65;
pub const WAVE_LONG_VISIBLE_RIGHT: f64 = 0.8;

/// Fade and dead margins for the longest waves.
pub const WAVE_LONG_FADE_PX: f64 = 45.0;
pub const WAVE_LONG_DEAD_PX: f64 = 10.0;

/// Random draws per lane pick before giving up on avoiding busy lanes.
pub const WAVE_LANE_TRIES: usize = 40;
