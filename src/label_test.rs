#![allow(clippy::float_cmp)]

use super::*;

fn label(id: usize, text: &str, rect: Option<Rect>) -> Label {
    Label { id: LabelId(id), text: text.into(), client_rect: rect }
}

fn mount() -> Option<Rect> {
    Some(Rect::new(0.0, 0.0, 1000.0, 800.0))
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// nearest_label
// =============================================================

#[test]
fn picks_closest_center() {
    let region = Some(Rect::new(100.0, 100.0, 100.0, 100.0));
    let labels = vec![
        label(0, "VENETO", Some(Rect::new(500.0, 500.0, 60.0, 12.0))),
        label(1, "LOMBARDIA", Some(Rect::new(130.0, 140.0, 60.0, 12.0))),
        label(2, "TUSCANY", Some(Rect::new(300.0, 300.0, 60.0, 12.0))),
    ];
    assert_eq!(nearest_label(region, &labels, mount()), Some(LabelId(1)));
}

#[test]
fn skips_unmeasurable_labels() {
    let region = Some(Rect::new(100.0, 100.0, 100.0, 100.0));
    let labels = vec![
        label(0, "A", Some(Rect::new(140.0, 140.0, 0.5, 12.0))),
        label(1, "B", None),
        label(2, "C", Some(Rect::new(400.0, 400.0, 60.0, 12.0))),
    ];
    assert_eq!(nearest_label(region, &labels, mount()), Some(LabelId(2)));
}

#[test]
fn skips_labels_outside_mount() {
    let region = Some(Rect::new(900.0, 100.0, 100.0, 100.0));
    let labels = vec![
        label(0, "OFFSCREEN", Some(Rect::new(1100.0, 140.0, 60.0, 12.0))),
        label(1, "VISIBLE", Some(Rect::new(500.0, 140.0, 60.0, 12.0))),
    ];
    assert_eq!(nearest_label(region, &labels, mount()), Some(LabelId(1)));
}

#[test]
fn without_mount_every_label_counts() {
    let region = Some(Rect::new(900.0, 100.0, 100.0, 100.0));
    let labels = vec![
        label(0, "OFFSCREEN", Some(Rect::new(1000.0, 140.0, 60.0, 12.0))),
        label(1, "VISIBLE", Some(Rect::new(500.0, 140.0, 60.0, 12.0))),
    ];
    assert_eq!(nearest_label(region, &labels, None), Some(LabelId(0)));
}

#[test]
fn unmeasurable_region_has_no_label() {
    let labels = vec![label(0, "A", Some(Rect::new(0.0, 0.0, 60.0, 12.0)))];
    assert_eq!(nearest_label(Some(Rect::new(0.0, 0.0, 0.0, 10.0)), &labels, mount()), None);
    assert_eq!(nearest_label(None, &labels, mount()), None);
}

#[test]
fn no_labels_no_match() {
    assert_eq!(nearest_label(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), &[], mount()), None);
}

// =============================================================
// underline_for
// =============================================================

#[test]
fn underline_sits_below_label_with_padding() {
    let rect = Rect::new(100.0, 50.0, 80.0, 12.0);
    let u = underline_for(&rect, "VENETO", Some(Affine::IDENTITY), &Tuning::default());
    assert_eq!(u.from, Point::new(98.5, 62.5));
    assert_eq!(u.to, Point::new(181.5, 62.5));
}

#[test]
fn friuli_is_shrunk() {
    let rect = Rect::new(100.0, 50.0, 120.0, 12.0);
    let u = underline_for(&rect, "Friuli Venezia Giulia", Some(Affine::IDENTITY), &Tuning::default());
    assert_eq!(u.from.x, 100.0 - 1.5 + 16.0);
    assert_eq!(u.to.x, 220.0 + 1.5 - 16.0);
}

#[test]
fn maps_through_inverse_of_client_to_layer() {
    // Layer is scaled ×2 and panned by (10, 20) on screen.
    let ctm = Affine::translate_scale(10.0, 20.0, 2.0);
    let rect = Rect::new(110.0, 60.0, 40.0, 10.0);
    let u = underline_for(&rect, "PUGLIA", Some(ctm), &Tuning::default());
    assert!(approx_eq(u.from.x, (108.5 - 10.0) / 2.0));
    assert!(approx_eq(u.from.y, (70.5 - 20.0) / 2.0));
    assert!(approx_eq(u.to.x, (151.5 - 10.0) / 2.0));
}

#[test]
fn singular_ctm_passes_client_coords_through() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    let singular = Affine { a: 0.0, b: 0.0, c: 0.0, d: 0.0, e: 0.0, f: 0.0 };
    let u = underline_for(&rect, "X", Some(singular), &Tuning::default());
    assert_eq!(u.from, Point::new(-1.5, 10.5));
    let u = underline_for(&rect, "X", None, &Tuning::default());
    assert_eq!(u.to, Point::new(11.5, 10.5));
}
