//! Label alignment: which label belongs to a region, and where its underline
//! goes.
//!
//! Everything here is measured in client space and converted to layer space
//! at the end, so it works regardless of the current zoom.

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;

use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::consts::{MIN_MEASURABLE_PX, UNDERLINE_OFFSET_Y, UNDERLINE_PAD_X};
use crate::geom::{Affine, Point, Rect, screen_to_scene};
use crate::host::{Label, LabelId};

/// An underline segment in layer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Underline {
    pub from: Point,
    pub to: Point,
}

/// The label whose client-rect center is nearest the region's.
///
/// Only labels that are measurable and intersect the mount rect are
/// candidates. Returns `None` if the region itself is unmeasurable.
#[must_use]
pub fn nearest_label(region_rect: Option<Rect>, labels: &[Label], mount: Option<Rect>) -> Option<LabelId> {
    let region = region_rect.filter(|r| r.is_measurable(MIN_MEASURABLE_PX))?;
    labels
        .iter()
        .filter_map(|label| {
            let rect = label.client_rect.filter(|r| r.is_measurable(MIN_MEASURABLE_PX))?;
            if mount.is_some_and(|m| !rect.intersects(&m)) {
                return None;
            }
            Some((label.id, region.center_distance_sq(&rect)))
        })
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Underline just below a label's client rect, mapped into layer space.
///
/// `client_to_layer` is `screenCTM × layerTransform`; when it is missing or
/// singular the client coordinates pass through unchanged.
#[must_use]
pub fn underline_for(label_rect: &Rect, text: &str, client_to_layer: Option<Affine>, tuning: &Tuning) -> Underline {
    let shrink = tuning.underline_shrink_for(text);
    let y = label_rect.bottom() + UNDERLINE_OFFSET_Y;
    let from = Point::new(label_rect.x - UNDERLINE_PAD_X + shrink, y);
    let to = Point::new(label_rect.right() + UNDERLINE_PAD_X - shrink, y);
    Underline {
        from: screen_to_scene(client_to_layer, from),
        to: screen_to_scene(client_to_layer, to),
    }
}
