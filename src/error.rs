//! Initialization errors.
//!
//! Nothing in the engine propagates these to the page: the DOM entry point
//! logs them and hands back `None`, leaving the mount untouched or showing a
//! static map.

/// Why a map instance could not be brought up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// No mount selector or element was supplied.
    #[error("missing mount")]
    MissingMount,
    /// The mount selector matched nothing.
    #[error("mount not found: {0}")]
    MountNotFound(String),
    /// No scene document URL was supplied.
    #[error("missing url")]
    MissingUrl,
    /// The scene document request failed outright.
    #[error("scene fetch failed: {0}")]
    Fetch(String),
    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    /// The scene document could not be parsed.
    #[error("scene parse error: {0}")]
    Parse(String),
    /// The scene has no addressable regions.
    #[error("scene has no regions")]
    NoRegions,
    /// The scene's view box or content bounds could not be measured.
    #[error("scene is not measurable")]
    Unmeasurable,
    /// No browser window (and so no frame clock) is available.
    #[error("no window available")]
    NoWindow,
    /// Wiring the scene to the page (listeners, frame loop) failed.
    #[error("DOM binding failed: {0}")]
    Binding(String),
    /// The options object could not be read.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Render a thrown JS value as text for logs and error payloads.
#[must_use]
pub fn js_error(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
