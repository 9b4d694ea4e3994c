//! The capabilities the engine needs from the scene graph that hosts it.
//!
//! Every method is a read. The engine never writes to the host directly;
//! writes come back as [`crate::engine::Action`]s. A query that cannot be
//! answered right now (detached element, zero-size layout) returns `None`
//! and the engine skips whatever depended on it for that frame.

use crate::geom::{Affine, Point, Rect, ViewBox};
use crate::region::RegionId;

/// Identity of a text label: its index in the host's label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(pub usize);

/// A text label as currently laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: LabelId,
    pub text: String,
    /// Client (screen) rect, or `None` if it cannot be measured.
    pub client_rect: Option<Rect>,
}

/// Read-only geometry queries against the live scene.
pub trait SceneHost {
    /// The scene root's view box.
    fn view_box(&self) -> Option<ViewBox>;

    /// Bounding box of all drawable content, in layer space.
    fn scene_bounds(&self) -> Option<Rect>;

    /// Bounding box of a region, in layer space.
    fn region_bbox(&self, id: RegionId) -> Option<Rect>;

    /// Client rect of a region as currently rendered.
    fn region_client_rect(&self, id: RegionId) -> Option<Rect>;

    /// Client rect of the element the scene is mounted in.
    fn mount_client_rect(&self) -> Option<Rect>;

    /// All text labels in the scene.
    fn labels(&self) -> Vec<Label>;

    /// Topmost region under a client point.
    fn region_at(&self, client: Point) -> Option<RegionId>;

    /// The scene root's screen CTM (scene units → client pixels).
    fn screen_ctm(&self) -> Option<Affine>;
}
