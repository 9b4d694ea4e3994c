#![allow(clippy::float_cmp)]

use super::*;
use crate::region::RegionId;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Transform ---

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t, Transform::new(0.0, 0.0, 1.0));
}

#[test]
fn to_affine_scales_then_pans() {
    let t = Transform::new(15.0, -8.0, 1.5);
    let p = t.to_affine().apply(Point::new(4.0, 6.0));
    assert!(approx_eq(p.x, 21.0));
    assert!(approx_eq(p.y, 1.0));
}

#[test]
fn to_affine_inverts_back_to_layer_space() {
    let t = Transform::new(-120.0, 40.0, 2.4);
    let p = Point::new(310.0, 77.0);
    let m = t.to_affine();
    let back = m.inverse().unwrap().apply(m.apply(p));
    assert!(approx_eq(back.x, p.x));
    assert!(approx_eq(back.y, p.y));
}

#[test]
fn with_pan_keeps_scale() {
    let t = Transform::new(1.0, 2.0, 3.0).with_pan(Point::new(9.0, 8.0));
    assert_eq!(t, Transform::new(9.0, 8.0, 3.0));
}

// --- Viewport ---

#[test]
fn viewport_starts_idle() {
    let vp = Viewport::new(Transform::new(1.0, 2.0, 3.0));
    assert!(!vp.is_animating());
    assert_eq!(vp.active_tween_count(), 0);
    assert_eq!(vp.current(), Transform::new(1.0, 2.0, 3.0));
}

#[test]
fn step_without_tween_is_none() {
    let mut vp = Viewport::default();
    assert!(vp.step(100.0).is_none());
}

#[test]
fn animate_then_step_to_completion() {
    let mut vp = Viewport::new(Transform::default());
    vp.animate_to(Transform::new(100.0, 0.0, 2.0), 500.0, Ease::Power1InOut, 0.0, Completion::ResetDone);

    let mid = vp.step(250.0).unwrap();
    assert!(approx_eq(mid.transform.x, 50.0));
    assert!(mid.completed.is_none());
    assert!(vp.is_animating());

    let end = vp.step(500.0).unwrap();
    assert_eq!(end.transform, Transform::new(100.0, 0.0, 2.0));
    assert_eq!(end.completed, Some(Completion::ResetDone));
    assert!(!vp.is_animating());
    assert!(vp.step(600.0).is_none());
}

#[test]
fn second_animation_supersedes_first() {
    let mut vp = Viewport::new(Transform::default());
    let first = vp.animate_to(Transform::new(100.0, 0.0, 2.0), 500.0, Ease::Power1InOut, 0.0, Completion::ZoomedIn(RegionId(1)));
    vp.step(250.0);
    let second = vp.animate_to(Transform::new(0.0, 0.0, 1.0), 500.0, Ease::Power1InOut, 250.0, Completion::ResetDone);

    assert_ne!(first, second);
    assert_eq!(vp.active_tween_count(), 1);
    assert_eq!(vp.tween().unwrap().id, second);
    // The new tween starts from the mid-flight value.
    assert!(approx_eq(vp.tween().unwrap().from.x, 50.0));

    // The killed tween's completion never surfaces.
    let mut completions = Vec::new();
    let mut now = 250.0;
    while let Some(step) = vp.step(now) {
        if let Some(c) = step.completed {
            completions.push(c);
        }
        now += 50.0;
    }
    assert_eq!(completions, vec![Completion::ResetDone]);
}

#[test]
fn set_immediately_kills_tween() {
    let mut vp = Viewport::new(Transform::default());
    vp.animate_to(Transform::new(100.0, 0.0, 2.0), 500.0, Ease::Power1InOut, 0.0, Completion::ResetDone);
    vp.set_immediately(Transform::new(5.0, 5.0, 1.0));
    assert!(!vp.is_animating());
    assert_eq!(vp.current(), Transform::new(5.0, 5.0, 1.0));
}

#[test]
fn kill_keeps_current_transform() {
    let mut vp = Viewport::new(Transform::default());
    vp.animate_to(Transform::new(100.0, 0.0, 2.0), 500.0, Ease::Power1InOut, 0.0, Completion::ResetDone);
    vp.step(250.0);
    vp.kill();
    assert!(!vp.is_animating());
    assert!(approx_eq(vp.current().x, 50.0));
}
