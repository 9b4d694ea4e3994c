//! Geometry primitives and stateless helpers: points, rects, view boxes,
//! affine matrices, pan clamping, and screen ↔ scene conversion.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in screen, scene, or layer space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle. Used for scene bounds, region bboxes, and client rects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether both edges are at least `min` long.
    #[must_use]
    pub fn is_measurable(&self, min: f64) -> bool {
        self.width >= min && self.height >= min
    }

    /// Whether `pt` lies inside this rect grown by `insets` (edges inclusive).
    #[must_use]
    pub fn contains_expanded(&self, pt: Point, insets: Insets) -> bool {
        pt.x >= self.x - insets.left
            && pt.x <= self.right() + insets.right
            && pt.y >= self.y - insets.top
            && pt.y <= self.bottom() + insets.bottom
    }

    /// Whether the two rects overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() >= other.x && self.x <= other.right() && self.bottom() >= other.y && self.y <= other.bottom()
    }

    /// Squared distance between the two rect centers.
    #[must_use]
    pub fn center_distance_sq(&self, other: &Rect) -> f64 {
        let a = self.center();
        let b = other.center();
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        dx * dx + dy * dy
    }

    /// Bounding rect of this rect's corners mapped through `m`.
    #[must_use]
    pub fn transformed(&self, m: &Affine) -> Rect {
        let corners = [
            m.apply(Point::new(self.x, self.y)),
            m.apply(Point::new(self.right(), self.y)),
            m.apply(Point::new(self.x, self.bottom())),
            m.apply(Point::new(self.right(), self.bottom())),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Per-edge padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// The same padding on every edge.
    #[must_use]
    pub fn uniform(pad: f64) -> Self {
        Self { top: pad, right: pad, bottom: pad, left: pad }
    }

    /// Edge-wise sum.
    #[must_use]
    pub fn plus(self, other: Insets) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

/// The visible coordinate window of the scene, in scene units.
///
/// `w` and `h` are positive; see [`ViewBox::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ViewBox {
    /// Build a view box, rejecting non-positive or non-finite sizes.
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Option<Self> {
        let finite = x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite();
        (finite && w > 0.0 && h > 0.0).then_some(Self { x, y, w, h })
    }

    /// A view box framing `bounds`, for scenes that declare none.
    #[must_use]
    pub fn from_bounds(bounds: &Rect) -> Option<Self> {
        Self::new(bounds.x, bounds.y, bounds.width, bounds.height)
    }

    /// The `viewBox` attribute value: `"x y w h"`.
    #[must_use]
    pub fn to_attr(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.w, self.h)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.point_at(0.5, 0.5)
    }

    /// The point at fractional position (`fx`, `fy`) inside the view box.
    #[must_use]
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + self.w * fx, self.y + self.h * fy)
    }
}

/// A 2D affine matrix in SVG/DOMMatrix layout.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Pan + uniform scale, as applied to the scene layer.
    #[must_use]
    pub fn translate_scale(x: f64, y: f64, scale: f64) -> Self {
        Self { a: scale, b: 0.0, c: 0.0, d: scale, e: x, f: y }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// `self × other`: applies `other` first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// The inverse matrix, or `None` when singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// Constrain a proposed pan so the scene keeps covering the viewport.
///
/// Per axis the pan is pinned into `[min, max]` where
/// `min = far edge of view box − pad − far edge of scene·scale` and
/// `max = near edge of view box + pad − near edge of scene·scale`.
/// When `min > max` the result is `max`.
#[must_use]
pub fn clamp_pan(pan: Point, scale: f64, pad: f64, view_box: &ViewBox, bounds: &Rect) -> Point {
    let min_x = view_box.x + view_box.w - pad - bounds.right() * scale;
    let max_x = view_box.x + pad - bounds.x * scale;
    let min_y = view_box.y + view_box.h - pad - bounds.bottom() * scale;
    let max_y = view_box.y + pad - bounds.y * scale;

    // Not f64::clamp: min may exceed max when the scene is smaller than the view.
    Point::new(pan.x.max(min_x).min(max_x), pan.y.max(min_y).min(max_y))
}

/// Map a screen point into scene space through the inverse of `screen_ctm`.
///
/// Returns `None` if the CTM is unavailable or singular.
#[must_use]
pub fn try_screen_to_scene(screen_ctm: Option<Affine>, screen: Point) -> Option<Point> {
    screen_ctm.and_then(|m| m.inverse()).map(|inv| inv.apply(screen))
}

/// Like [`try_screen_to_scene`], but hands back `screen` unchanged on failure.
#[must_use]
pub fn screen_to_scene(screen_ctm: Option<Affine>, screen: Point) -> Point {
    try_screen_to_scene(screen_ctm, screen).unwrap_or(screen)
}
