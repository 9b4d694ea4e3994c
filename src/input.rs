//! Input model: pointer samples, keys, and what an activation landed on.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::host::LabelId;
use crate::region::RegionId;

/// The last observed pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Client (CSS pixel) position.
    pub client: Point,
}

impl PointerSample {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y) }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Enter"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Enter and Space activate the focused region or label.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        self.0 == "Enter" || self.0 == " "
    }
}

/// What a click or key press resolved to.
///
/// Labels win over regions when an event target sits inside both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Label(LabelId),
    Region(RegionId),
}
