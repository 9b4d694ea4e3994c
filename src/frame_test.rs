#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn unbiased(zoom: f64) -> BaseFrameParams {
    BaseFrameParams { pad: 0.0, zoom, bias: Point::default(), shift_x_factor: 0.0, shift_y: 0.0 }
}

fn view() -> ViewBox {
    ViewBox::new(0.0, 0.0, 800.0, 600.0).unwrap()
}

fn scene() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 1000.0)
}

// =============================================================
// base_frame
// =============================================================

#[test]
fn base_frame_cover_scale_and_centering() {
    let t = base_frame(Some(&scene()), &view(), &unbiased(1.5));
    assert!(approx_eq(t.scale, 1.2));
    // Bounds centroid (500, 500) lands on the view center (400, 300).
    let centroid = t.to_affine().apply(Point::new(500.0, 500.0));
    assert!(approx_eq(centroid.x, 400.0));
    assert!(approx_eq(centroid.y, 300.0));
}

#[test]
fn base_frame_is_idempotent() {
    let params = BaseFrameParams::new(&Tuning::default(), &HoverZoomOptions::default());
    let a = base_frame(Some(&scene()), &view(), &params);
    let b = base_frame(Some(&scene()), &view(), &params);
    assert_eq!(a.x.to_bits(), b.x.to_bits());
    assert_eq!(a.y.to_bits(), b.y.to_bits());
    assert_eq!(a.scale.to_bits(), b.scale.to_bits());
}

#[test]
fn base_frame_pad_shrinks_cover() {
    let params = BaseFrameParams { pad: 100.0, ..unbiased(1.0) };
    let t = base_frame(Some(&scene()), &view(), &params);
    // max(800 / 1200, 600 / 1200)
    assert!(approx_eq(t.scale, 800.0 / 1200.0));
}

#[test]
fn base_frame_applies_bias_and_shift() {
    let params = BaseFrameParams {
        bias: Point::new(-150.0, -100.0),
        shift_x_factor: 0.05,
        shift_y: 80.0,
        ..unbiased(1.5)
    };
    let plain = base_frame(Some(&scene()), &view(), &unbiased(1.5));
    let t = base_frame(Some(&scene()), &view(), &params);
    assert!(approx_eq(t.x - plain.x, -150.0 + 40.0));
    assert!(approx_eq(t.y - plain.y, -100.0 + 80.0));
    assert_eq!(t.scale, plain.scale);
}

#[test]
fn base_frame_respects_view_box_origin() {
    let vb = ViewBox::new(100.0, 50.0, 800.0, 600.0).unwrap();
    let t = base_frame(Some(&scene()), &vb, &unbiased(1.5));
    let centroid = t.to_affine().apply(Point::new(500.0, 500.0));
    assert!(approx_eq(centroid.x, 500.0));
    assert!(approx_eq(centroid.y, 350.0));
}

#[test]
fn base_frame_without_bounds_is_identity() {
    assert_eq!(base_frame(None, &view(), &unbiased(1.5)), Transform::default());
}

#[test]
fn base_frame_degenerate_bounds_is_identity() {
    let t = base_frame(Some(&Rect::new(0.0, 0.0, 0.0, 0.0)), &view(), &unbiased(1.5));
    assert_eq!(t, Transform::default());
}

// =============================================================
// region_target
// =============================================================

fn target_params(scale: f64) -> TargetParams {
    TargetParams { scale, pad: 6.0, bias: Point::default(), anchor_factor: Point::new(0.5, 0.5) }
}

#[test]
fn region_target_aligns_center_to_anchor() {
    let bbox = Rect::new(400.0, 400.0, 100.0, 100.0);
    let anchor = Point::new(350.0, 250.0);
    let t = region_target(Some(bbox), Some(anchor), &view(), None, &target_params(2.4)).unwrap();
    let center = t.to_affine().apply(bbox.center());
    assert!(approx_eq(center.x, 350.0));
    assert!(approx_eq(center.y, 250.0));
    assert_eq!(t.scale, 2.4);
}

#[test]
fn region_target_defaults_to_view_anchor() {
    let bbox = Rect::new(400.0, 400.0, 100.0, 100.0);
    let params = TargetParams { anchor_factor: Point::new(0.75, 0.5), ..target_params(2.4) };
    let t = region_target(Some(bbox), None, &view(), None, &params).unwrap();
    let center = t.to_affine().apply(bbox.center());
    assert!(approx_eq(center.x, 600.0));
    assert!(approx_eq(center.y, 300.0));
}

#[test]
fn region_target_applies_bias() {
    let bbox = Rect::new(400.0, 400.0, 100.0, 100.0);
    let anchor = Some(Point::new(350.0, 250.0));
    let plain = region_target(Some(bbox), anchor, &view(), None, &target_params(2.4)).unwrap();
    let params = TargetParams { bias: Point::new(100.0, -10.0), ..target_params(2.4) };
    let biased = region_target(Some(bbox), anchor, &view(), None, &params).unwrap();
    assert!(approx_eq(biased.x - plain.x, 100.0));
    assert!(approx_eq(biased.y - plain.y, -10.0));
}

#[test]
fn region_target_clamps_with_hover_pad() {
    // Region in the top-left corner wants a large positive pan.
    let bbox = Rect::new(0.0, 0.0, 50.0, 50.0);
    let t = region_target(Some(bbox), Some(Point::new(400.0, 300.0)), &view(), Some(&scene()), &target_params(2.4)).unwrap();
    // max = view near + pad - scene near * scale = 6
    assert!(approx_eq(t.x, 6.0));
    assert!(approx_eq(t.y, 6.0));
}

#[test]
fn region_target_without_bbox_is_none() {
    assert!(region_target(None, Some(Point::new(1.0, 1.0)), &view(), Some(&scene()), &target_params(2.4)).is_none());
}
