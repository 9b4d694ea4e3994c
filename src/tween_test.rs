#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn tween(duration_ms: f64, ease: Ease) -> Tween {
    Tween {
        id: TweenId(0),
        from: Transform::new(0.0, 0.0, 1.0),
        to: Transform::new(100.0, -50.0, 3.0),
        start_ms: 1000.0,
        duration_ms,
        ease,
        completion: Completion::ResetDone,
    }
}

// --- Ease ---

#[test]
fn eases_hit_endpoints() {
    for ease in [Ease::Power1InOut, Ease::Power2Out] {
        assert!(approx_eq(ease.apply(0.0), 0.0), "{ease:?} at 0");
        assert!(approx_eq(ease.apply(1.0), 1.0), "{ease:?} at 1");
    }
}

#[test]
fn power1_in_out_is_symmetric_at_midpoint() {
    assert!(approx_eq(Ease::Power1InOut.apply(0.5), 0.5));
    assert!(approx_eq(Ease::Power1InOut.apply(0.25), 0.125));
    assert!(approx_eq(Ease::Power1InOut.apply(0.75), 0.875));
}

#[test]
fn power2_out_front_loads_motion() {
    assert!(Ease::Power2Out.apply(0.25) > 0.25);
    assert!(approx_eq(Ease::Power2Out.apply(0.5), 0.875));
}

#[test]
fn ease_clamps_out_of_range_progress() {
    assert_eq!(Ease::Power1InOut.apply(-1.0), 0.0);
    assert_eq!(Ease::Power2Out.apply(2.0), 1.0);
}

#[test]
fn eases_are_monotonic() {
    for ease in [Ease::Power1InOut, Ease::Power2Out] {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!(v >= prev, "{ease:?} decreased at step {i}");
            prev = v;
        }
    }
}

// --- Tween ---

#[test]
fn tween_progress_tracks_time() {
    let t = tween(500.0, Ease::Power1InOut);
    assert_eq!(t.progress(900.0), 0.0);
    assert_eq!(t.progress(1000.0), 0.0);
    assert!(approx_eq(t.progress(1250.0), 0.5));
    assert_eq!(t.progress(1500.0), 1.0);
    assert_eq!(t.progress(9000.0), 1.0);
}

#[test]
fn tween_sample_interpolates_all_components() {
    let t = tween(500.0, Ease::Power1InOut);
    let mid = t.sample(1250.0);
    assert!(approx_eq(mid.x, 50.0));
    assert!(approx_eq(mid.y, -25.0));
    assert!(approx_eq(mid.scale, 2.0));
}

#[test]
fn tween_sample_lands_exactly_on_target() {
    let t = tween(750.0, Ease::Power1InOut);
    assert_eq!(t.sample(1750.0), t.to);
    assert!(t.is_finished(1750.0));
    assert!(!t.is_finished(1749.0));
}

#[test]
fn zero_duration_tween_is_finished_immediately() {
    let t = tween(0.0, Ease::Power1InOut);
    assert!(t.is_finished(0.0));
    assert_eq!(t.sample(0.0), t.to);
}

// --- FrameClock ---

#[test]
fn frame_clock_starts_at_zero_then_tracks_gaps() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.advance(1000.0), 0.0);
    assert!(approx_eq(clock.advance(1016.0), 0.016));
    assert!(approx_eq(clock.advance(1516.0), 0.5));
}

#[test]
fn frame_clock_flattens_lag_and_ignores_backwards_time() {
    let mut clock = FrameClock::default();
    clock.advance(1000.0);
    assert_eq!(clock.advance(3000.0), 0.033);
    assert_eq!(clock.advance(2900.0), 0.0);
}
