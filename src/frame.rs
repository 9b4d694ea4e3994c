//! Frame calculators: the idle cover frame and the hover frame for a region.
//!
//! Both are pure functions of the measured geometry. Callers measure through
//! the host each time; nothing here caches.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use crate::config::{HoverZoomOptions, Tuning};
use crate::geom::{Point, Rect, ViewBox, clamp_pan};
use crate::transform::Transform;

/// Inputs for [`base_frame`] besides geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFrameParams {
    /// Padding in scene units added around the bounds before covering.
    pub pad: f64,
    /// Cover multiplier, at least 1.
    pub zoom: f64,
    /// Fixed bias in scene units.
    pub bias: Point,
    /// Extra X shift as a fraction of the view box width.
    pub shift_x_factor: f64,
    /// Extra Y shift in scene units.
    pub shift_y: f64,
}

impl BaseFrameParams {
    #[must_use]
    pub fn new(tuning: &Tuning, opts: &HoverZoomOptions) -> Self {
        Self {
            pad: tuning.base_pad,
            zoom: tuning.base_zoom,
            bias: Point::new(tuning.base_bias_x, tuning.base_bias_y),
            shift_x_factor: opts.base_shift_x_factor,
            shift_y: opts.base_shift_y,
        }
    }
}

/// The idle "cover" transform: scene bounds scaled to cover the view box,
/// cropped by `zoom`, centroid under the view box center, then biased.
///
/// Without measurable bounds this is the identity.
#[must_use]
pub fn base_frame(bounds: Option<&Rect>, view_box: &ViewBox, params: &BaseFrameParams) -> Transform {
    let Some(bounds) = bounds else {
        return Transform::default();
    };

    let padded_w = bounds.width + params.pad * 2.0;
    let padded_h = bounds.height + params.pad * 2.0;
    let cover = (view_box.w / padded_w).max(view_box.h / padded_h);
    let scale = cover * params.zoom;
    if !scale.is_finite() || scale <= 0.0 {
        return Transform::default();
    }

    let center = bounds.center();
    let view_center = view_box.center();
    Transform {
        x: view_center.x - center.x * scale + params.bias.x + view_box.w * params.shift_x_factor,
        y: view_center.y - center.y * scale + params.bias.y + params.shift_y,
        scale,
    }
}

/// Inputs for [`region_target`] besides geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetParams {
    /// Zoomed scale (base scale × hover multiplier).
    pub scale: f64,
    /// Clamp padding while zoomed.
    pub pad: f64,
    /// Hover bias, already resolved for the region.
    pub bias: Point,
    /// Where the region center goes when there is no pointer anchor,
    /// as fractions of the view box.
    pub anchor_factor: Point,
}

/// The hover transform for a region.
///
/// The region's bbox center is aligned to `anchor` (the pointer in scene
/// space), not to the view center, so a region entered near its top edge
/// stays under the cursor. Without an anchor the view-box anchor point is
/// used. The pan is clamped with the hover pad when scene bounds are known.
///
/// Returns `None` when the region bbox is unavailable.
#[must_use]
pub fn region_target(
    region_bbox: Option<Rect>,
    anchor: Option<Point>,
    view_box: &ViewBox,
    bounds: Option<&Rect>,
    params: &TargetParams,
) -> Option<Transform> {
    let bbox = region_bbox?;
    let anchor = anchor.unwrap_or_else(|| view_box.point_at(params.anchor_factor.x, params.anchor_factor.y));
    let center = bbox.center();

    let raw = Point::new(
        anchor.x - center.x * params.scale + params.bias.x,
        anchor.y - center.y * params.scale + params.bias.y,
    );
    let pan = match bounds {
        Some(b) => clamp_pan(raw, params.scale, params.pad, view_box, b),
        None => raw,
    };
    Some(Transform { x: pan.x, y: pan.y, scale: params.scale })
}
