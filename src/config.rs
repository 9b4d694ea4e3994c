//! Init options and tuning.
//!
//! `MapOptions` is what a page hands to `init_map`. It deserializes from the
//! camelCase JSON / JS object shape pages already use. `Tuning` collects every
//! numeric knob with defaults from [`crate::consts`]; pages normally leave it
//! alone.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Catalog;
use crate::consts::*;
use crate::error::{InitError, js_error};
use crate::region::RegionRules;

/// Options for one map instance.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    /// Selector of the element the scene is mounted into. Anything but a
    /// string (an element handed over from JS) reads as `None`.
    #[serde(deserialize_with = "selector_or_none")]
    pub mount: Option<String>,
    /// URL of the scene document.
    pub url: Option<String>,
    /// Class added to the scene root.
    pub class_name: String,
    /// Whether the decorative wave tiles drift.
    pub waves: bool,
    /// Whether the hover-zoom engine runs at all.
    pub region_hover_zoom: bool,
    pub region_hover_options: HoverZoomOptions,
    pub tuning: Tuning,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            mount: Some("#map".into()),
            url: None,
            class_name: "region-map".into(),
            waves: true,
            region_hover_zoom: true,
            region_hover_options: HoverZoomOptions::default(),
            tuning: Tuning::default(),
        }
    }
}

impl MapOptions {
    /// Parse options from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidOptions`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, InitError> {
        let opts: Self = serde_json::from_str(json).map_err(|e| InitError::InvalidOptions(e.to_string()))?;
        Ok(opts.normalized())
    }

    /// Read options from a plain JS object. `undefined` and `null` give the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidOptions`] if the object cannot be
    /// serialized or does not match.
    pub fn from_js(value: &wasm_bindgen::JsValue) -> Result<Self, InitError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let json = js_sys::JSON::stringify(value).map_err(|e| InitError::InvalidOptions(js_error(&e)))?;
        Self::from_json(&String::from(json))
    }

    /// Clamp and clean every field that has a valid range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.mount = non_empty(self.mount);
        self.url = non_empty(self.url);
        self.region_hover_options = self.region_hover_options.normalized();
        self
    }

    /// The mount selector and URL, or why they are unusable.
    ///
    /// # Errors
    ///
    /// [`InitError::MissingUrl`] or [`InitError::MissingMount`].
    pub fn require_source(&self) -> Result<(&str, &str), InitError> {
        let url = self.url.as_deref().ok_or(InitError::MissingUrl)?;
        let mount = self.mount.as_deref().ok_or(InitError::MissingMount)?;
        Ok((mount, url))
    }
}

/// Options for the hover-zoom engine.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverZoomOptions {
    /// Pointer- and focus-driven zoom. Off for touch devices.
    pub enable_interactions: bool,
    /// Click / keyboard navigation, independent of hover.
    pub enable_map_navigation: bool,
    /// Elements elsewhere in the page that drive the zoom instead of the
    /// scene's own regions.
    pub external_hover_selector: Option<String>,
    /// Idle anchor as a fraction of view box width, 0..=1.
    #[serde(deserialize_with = "nan_if_null")]
    pub hover_anchor_x_factor: f64,
    /// Idle anchor as a fraction of view box height, 0..=1.
    #[serde(deserialize_with = "nan_if_null")]
    pub hover_anchor_y_factor: f64,
    /// Whether leaving an external trigger resets the zoom.
    pub external_hover_reset: bool,
    /// Idle-frame shift as a fraction of view box width, -1..=1.
    #[serde(deserialize_with = "nan_if_null")]
    pub base_shift_x_factor: f64,
    /// Idle-frame vertical shift in scene units.
    #[serde(deserialize_with = "nan_if_null")]
    pub base_shift_y: f64,
}

impl Default for HoverZoomOptions {
    fn default() -> Self {
        Self {
            enable_interactions: true,
            enable_map_navigation: true,
            external_hover_selector: None,
            hover_anchor_x_factor: HOVER_ANCHOR_FACTOR,
            hover_anchor_y_factor: HOVER_ANCHOR_FACTOR,
            external_hover_reset: true,
            base_shift_x_factor: 0.0,
            base_shift_y: 0.0,
        }
    }
}

impl HoverZoomOptions {
    /// Clamp factors into range and fall back to defaults for non-finite values.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.hover_anchor_x_factor = finite_or(self.hover_anchor_x_factor, defaults.hover_anchor_x_factor).clamp(0.0, 1.0);
        self.hover_anchor_y_factor = finite_or(self.hover_anchor_y_factor, defaults.hover_anchor_y_factor).clamp(0.0, 1.0);
        self.base_shift_x_factor = finite_or(self.base_shift_x_factor, defaults.base_shift_x_factor).clamp(-1.0, 1.0);
        self.base_shift_y = finite_or(self.base_shift_y, defaults.base_shift_y);
        self.external_hover_selector = non_empty(self.external_hover_selector.map(|s| s.trim().to_owned()));
        self
    }
}

/// Every numeric knob of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub base_pad: f64,
    pub base_zoom: f64,
    pub base_bias_x: f64,
    pub base_bias_y: f64,
    pub hover_scale: f64,
    pub hover_pad: f64,
    pub hover_bias_x: f64,
    pub hover_bias_y: f64,
    pub dur_in_ms: f64,
    pub dur_out_ms: f64,
    pub dur_resize_ms: f64,
    pub sticky_px: f64,
    pub switch_cooldown_ms: f64,
    pub forgive_px: f64,
    pub reset_delay_ms: f64,
    pub parallax_strength: f64,
    pub parallax_max_px: f64,
    pub parallax_tau_sec: f64,
    pub parallax_float_px: f64,
    pub parallax_float_sec: f64,
    pub parallax_idle_delay_ms: f64,
    pub parallax_wake_px: f64,
    pub region_rules: RegionRules,
    pub catalog: Catalog,
    /// Per-label underline shrink, matched by case-insensitive substring.
    pub underline_shrink: Vec<UnderlineShrink>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_pad: BASE_PAD,
            base_zoom: BASE_ZOOM,
            base_bias_x: BASE_BIAS_X,
            base_bias_y: BASE_BIAS_Y,
            hover_scale: HOVER_SCALE,
            hover_pad: HOVER_PAD,
            hover_bias_x: HOVER_BIAS_X,
            hover_bias_y: HOVER_BIAS_Y,
            dur_in_ms: DUR_IN_MS,
            dur_out_ms: DUR_OUT_MS,
            dur_resize_ms: DUR_RESIZE_MS,
            sticky_px: STICKY_PX,
            switch_cooldown_ms: SWITCH_COOLDOWN_MS,
            forgive_px: HOVER_FORGIVE_PX,
            reset_delay_ms: RESET_DELAY_MS,
            parallax_strength: PARALLAX_STRENGTH,
            parallax_max_px: PARALLAX_MAX_PX,
            parallax_tau_sec: PARALLAX_TAU_SEC,
            parallax_float_px: PARALLAX_FLOAT_PX,
            parallax_float_sec: PARALLAX_FLOAT_SEC,
            parallax_idle_delay_ms: PARALLAX_IDLE_DELAY_MS,
            parallax_wake_px: PARALLAX_WAKE_PX,
            region_rules: RegionRules::default(),
            catalog: Catalog::default(),
            underline_shrink: vec![UnderlineShrink { name: "FRIULI".into(), px: 16.0 }],
        }
    }
}

impl Tuning {
    /// Underline shrink for a label with `text`.
    #[must_use]
    pub fn underline_shrink_for(&self, text: &str) -> f64 {
        let upper = text.to_uppercase();
        self.underline_shrink
            .iter()
            .find(|s| upper.contains(&s.name.to_uppercase()))
            .map_or(0.0, |s| s.px)
    }
}

/// Pulls both underline ends inward for one visually long label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlineShrink {
    pub name: String,
    pub px: f64,
}

/// `null` reads as NaN, which `normalized` then replaces with the default.
/// JS `NaN` and `Infinity` serialize to `null`.
fn nan_if_null<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

fn selector_or_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
