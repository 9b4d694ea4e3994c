#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn vb(x: f64, y: f64, w: f64, h: f64) -> ViewBox {
    ViewBox::new(x, y, w, h).unwrap()
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0));
}

// --- Rect ---

#[test]
fn rect_edges_and_center() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(r.right(), 110.0);
    assert_eq!(r.bottom(), 70.0);
    assert!(point_approx_eq(r.center(), Point::new(60.0, 45.0)));
}

#[test]
fn rect_measurable_requires_both_edges() {
    assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_measurable(1.0));
    assert!(!Rect::new(0.0, 0.0, 0.5, 10.0).is_measurable(1.0));
    assert!(!Rect::new(0.0, 0.0, 10.0, 0.0).is_measurable(1.0));
}

#[test]
fn rect_contains_expanded_uniform() {
    let r = Rect::new(0.0, 0.0, 100.0, 100.0);
    let pad = Insets::uniform(90.0);
    assert!(r.contains_expanded(Point::new(-90.0, -90.0), pad));
    assert!(r.contains_expanded(Point::new(190.0, 190.0), pad));
    assert!(!r.contains_expanded(Point::new(190.1, 50.0), pad));
    assert!(!r.contains_expanded(Point::new(50.0, -90.1), pad));
}

#[test]
fn rect_contains_expanded_asymmetric() {
    let r = Rect::new(0.0, 0.0, 100.0, 100.0);
    let pad = Insets::uniform(10.0).plus(Insets { top: 200.0, right: 100.0, ..Insets::default() });
    assert!(r.contains_expanded(Point::new(50.0, -210.0), pad));
    assert!(r.contains_expanded(Point::new(210.0, 50.0), pad));
    assert!(!r.contains_expanded(Point::new(-11.0, 50.0), pad));
    assert!(!r.contains_expanded(Point::new(50.0, 111.0), pad));
}

#[test]
fn rect_intersects_touching_and_disjoint() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)));
    assert!(a.intersects(&Rect::new(-5.0, -5.0, 20.0, 20.0)));
    assert!(!a.intersects(&Rect::new(10.1, 0.0, 5.0, 5.0)));
}

#[test]
fn rect_center_distance_sq() {
    let a = Rect::new(0.0, 0.0, 2.0, 2.0);
    let b = Rect::new(3.0, 4.0, 2.0, 2.0);
    assert!(approx_eq(a.center_distance_sq(&b), 25.0));
}

#[test]
fn rect_transformed_by_translate_scale() {
    let r = Rect::new(10.0, 10.0, 20.0, 30.0);
    let out = r.transformed(&Affine::translate_scale(5.0, -5.0, 2.0));
    assert_eq!(out, Rect::new(25.0, 15.0, 40.0, 60.0));
}

// --- ViewBox ---

#[test]
fn view_box_rejects_degenerate_sizes() {
    assert!(ViewBox::new(0.0, 0.0, 0.0, 10.0).is_none());
    assert!(ViewBox::new(0.0, 0.0, 10.0, -1.0).is_none());
    assert!(ViewBox::new(0.0, f64::NAN, 10.0, 10.0).is_none());
    assert!(ViewBox::new(0.0, 0.0, 10.0, 10.0).is_some());
}

#[test]
fn view_box_point_at_fractions() {
    let v = vb(100.0, 50.0, 800.0, 600.0);
    assert!(point_approx_eq(v.center(), Point::new(500.0, 350.0)));
    assert!(point_approx_eq(v.point_at(0.75, 0.0), Point::new(700.0, 50.0)));
}

#[test]
fn view_box_inferred_from_content_bounds() {
    let v = ViewBox::from_bounds(&Rect::new(-12.5, 4.0, 640.0, 480.25)).unwrap();
    assert_eq!(v, vb(-12.5, 4.0, 640.0, 480.25));
    assert_eq!(v.to_attr(), "-12.5 4 640 480.25");
}

#[test]
fn empty_content_infers_no_view_box() {
    assert!(ViewBox::from_bounds(&Rect::new(0.0, 0.0, 0.0, 0.0)).is_none());
    assert!(ViewBox::from_bounds(&Rect::new(0.0, 0.0, f64::INFINITY, 10.0)).is_none());
}

// --- Affine ---

#[test]
fn affine_identity_apply() {
    let p = Point::new(7.0, -3.0);
    assert_eq!(Affine::IDENTITY.apply(p), p);
}

#[test]
fn affine_inverse_round_trip() {
    let m = Affine { a: 2.0, b: 0.5, c: -0.25, d: 1.5, e: 30.0, f: -12.0 };
    let inv = m.inverse().unwrap();
    let p = Point::new(13.0, 27.0);
    assert!(point_approx_eq(inv.apply(m.apply(p)), p));
}

#[test]
fn affine_singular_has_no_inverse() {
    let m = Affine { a: 0.0, b: 0.0, c: 0.0, d: 0.0, e: 1.0, f: 1.0 };
    assert!(m.inverse().is_none());
}

#[test]
fn affine_multiply_applies_right_operand_first() {
    let screen = Affine::translate_scale(100.0, 0.0, 1.0);
    let layer = Affine::translate_scale(0.0, 0.0, 2.0);
    let p = screen.multiply(&layer).apply(Point::new(10.0, 10.0));
    assert!(point_approx_eq(p, Point::new(120.0, 20.0)));
}

// --- clamp_pan ---

#[test]
fn clamp_pan_inside_range_is_untouched() {
    let v = vb(0.0, 0.0, 800.0, 600.0);
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    // min_x = 800 - 1200 = -400, max_x = 0
    let out = clamp_pan(Point::new(-200.0, -300.0), 1.2, 0.0, &v, &bounds);
    assert!(point_approx_eq(out, Point::new(-200.0, -300.0)));
}

#[test]
fn clamp_pan_pins_to_boundaries() {
    let v = vb(0.0, 0.0, 800.0, 600.0);
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let low = clamp_pan(Point::new(-5000.0, -5000.0), 1.2, 0.0, &v, &bounds);
    assert!(point_approx_eq(low, Point::new(-400.0, -600.0)));
    let high = clamp_pan(Point::new(5000.0, 5000.0), 1.2, 0.0, &v, &bounds);
    assert!(point_approx_eq(high, Point::new(0.0, 0.0)));
}

#[test]
fn clamp_pan_pad_widens_range() {
    let v = vb(0.0, 0.0, 800.0, 600.0);
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let out = clamp_pan(Point::new(5000.0, -5000.0), 1.2, 6.0, &v, &bounds);
    assert!(point_approx_eq(out, Point::new(6.0, -606.0)));
}

#[test]
fn clamp_pan_is_monotonic_not_wrapping() {
    let v = vb(0.0, 0.0, 800.0, 600.0);
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let mut prev = f64::NEG_INFINITY;
    let mut x = -1000.0;
    while x <= 600.0 {
        let out = clamp_pan(Point::new(x, 0.0), 1.2, 0.0, &v, &bounds);
        assert!(out.x >= prev, "clamp output decreased at x={x}");
        assert!(out.x >= -400.0 && out.x <= 0.0);
        prev = out.x;
        x += 25.0;
    }
}

#[test]
fn clamp_pan_scene_smaller_than_view_pins_to_max() {
    let v = vb(0.0, 0.0, 800.0, 600.0);
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    // min_x = 700 > max_x = 0; result is max.
    let out = clamp_pan(Point::new(350.0, 250.0), 1.0, 0.0, &v, &bounds);
    assert!(point_approx_eq(out, Point::new(0.0, 0.0)));
}

// --- screen_to_scene ---

#[test]
fn screen_to_scene_inverts_ctm() {
    let ctm = Affine::translate_scale(50.0, 20.0, 0.5);
    let p = screen_to_scene(Some(ctm), Point::new(100.0, 70.0));
    assert!(point_approx_eq(p, Point::new(100.0, 100.0)));
}

#[test]
fn screen_to_scene_without_ctm_returns_input() {
    let p = Point::new(12.0, 34.0);
    assert_eq!(screen_to_scene(None, p), p);
    assert!(try_screen_to_scene(None, p).is_none());
}

#[test]
fn screen_to_scene_singular_ctm_returns_input() {
    let ctm = Affine { a: 0.0, b: 0.0, c: 0.0, d: 0.0, e: 0.0, f: 0.0 };
    let p = Point::new(12.0, 34.0);
    assert_eq!(screen_to_scene(Some(ctm), p), p);
    assert!(try_screen_to_scene(Some(ctm), p).is_none());
}
