//! Region identity, the read-only region directory, and per-region tuning.
//!
//! The directory is built once at init from whatever the host discovered
//! (`[data-region]` markers and `.region` classes in the DOM binding) and is
//! never mutated by pointer handling. Region geometry is not stored here; it
//! is measured through the host on demand because layout can change.
//!
//! Tuning that only applies to particular regions (a wider hover bias, extra
//! forgiveness on one edge) is data in [`RegionRules`] instead of identity
//! checks scattered through the engine.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::geom::{Insets, Point, ViewBox};

/// Stable identity of a region: its index in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// What the engine knows about a region besides its geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionInfo {
    /// Value of the region's semantic marker attribute, if any.
    pub code: Option<String>,
    /// Class tokens on the region element.
    pub classes: Vec<String>,
}

impl RegionInfo {
    #[must_use]
    pub fn new(code: Option<&str>, classes: &[&str]) -> Self {
        Self {
            code: code.map(str::to_owned),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Ordered, read-only collection of the scene's regions, plus the binding
/// from catalogue keys to regions used by external hover triggers.
#[derive(Debug, Clone, Default)]
pub struct RegionDirectory {
    regions: Vec<RegionInfo>,
    by_key: HashMap<String, RegionId>,
}

impl RegionDirectory {
    #[must_use]
    pub fn new(regions: Vec<RegionInfo>) -> Self {
        Self { regions, by_key: HashMap::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&RegionInfo> {
        self.regions.get(id.0)
    }

    /// All region ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        (0..self.regions.len()).map(RegionId)
    }

    /// Bind `key` to `id` unless the key is already bound.
    pub fn bind_key(&mut self, key: &str, id: RegionId) {
        self.by_key.entry(key.to_owned()).or_insert(id);
    }

    /// For every catalogue key still unbound, bind the region whose center
    /// lies nearest the key's geo anchor.
    ///
    /// `centers` holds the scene-space bbox center of each measurable region.
    pub fn bind_geo_fallbacks(&mut self, catalog: &Catalog, view_box: &ViewBox, centers: &[(RegionId, Point)]) {
        if centers.is_empty() {
            return;
        }
        for dest in catalog.entries() {
            if self.by_key.contains_key(&dest.key) {
                continue;
            }
            let Some(anchor) = dest.geo_anchor else {
                continue;
            };
            let target = view_box.point_at(anchor.x, anchor.y);
            let nearest = centers.iter().min_by(|(_, a), (_, b)| {
                let da = (a.x - target.x).powi(2) + (a.y - target.y).powi(2);
                let db = (b.x - target.x).powi(2) + (b.y - target.y).powi(2);
                da.total_cmp(&db)
            });
            if let Some((id, _)) = nearest {
                self.by_key.insert(dest.key.clone(), *id);
            }
        }
    }

    #[must_use]
    pub fn region_for_key(&self, key: &str) -> Option<RegionId> {
        self.by_key.get(key).copied()
    }
}

/// How a rule recognises a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionMatch {
    /// The marker attribute equals this code.
    Code(String),
    /// The element carries this class.
    Class(String),
}

impl RegionMatch {
    fn matches(&self, info: &RegionInfo) -> bool {
        match self {
            Self::Code(code) => info.code.as_deref() == Some(code.as_str()),
            Self::Class(class) => info.has_class(class),
        }
    }
}

/// Layout-specific tuning for the regions a rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRule {
    /// Any one of these selects the region.
    pub matches: Vec<RegionMatch>,
    /// Replaces the default hover X bias.
    #[serde(default)]
    pub hover_bias_x: Option<f64>,
    /// Added to the uniform forgiveness padding.
    #[serde(default)]
    pub forgive_extra: Insets,
}

/// Per-region tuning table. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionRules {
    rules: Vec<RegionRule>,
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            rules: vec![
                // Piedmont: its label would sit under the zoomed frame edge.
                RegionRule {
                    matches: vec![RegionMatch::Code("06".into()), RegionMatch::Class("st2".into())],
                    hover_bias_x: Some(100.0),
                    forgive_extra: Insets::default(),
                },
                // Puglia: hit box is narrower than the drawn heel.
                RegionRule {
                    matches: vec![RegionMatch::Class("st17".into())],
                    hover_bias_x: None,
                    forgive_extra: Insets { top: 200.0, right: 100.0, ..Insets::default() },
                },
                // Veneto: lagoon edge.
                RegionRule {
                    matches: vec![RegionMatch::Class("st1".into())],
                    hover_bias_x: None,
                    forgive_extra: Insets { top: 100.0, ..Insets::default() },
                },
            ],
        }
    }
}

impl RegionRules {
    #[must_use]
    pub fn new(rules: Vec<RegionRule>) -> Self {
        Self { rules }
    }

    /// First rule matching `info`.
    #[must_use]
    pub fn rule_for(&self, info: &RegionInfo) -> Option<&RegionRule> {
        self.rules.iter().find(|r| r.matches.iter().any(|m| m.matches(info)))
    }

    /// Hover X bias for `info`, or `default` when no rule overrides it.
    #[must_use]
    pub fn hover_bias_x(&self, info: &RegionInfo, default: f64) -> f64 {
        self.rule_for(info).and_then(|r| r.hover_bias_x).unwrap_or(default)
    }

    /// Forgiveness insets for `info`: `pad` on every side plus any rule extras.
    #[must_use]
    pub fn forgive_insets(&self, info: &RegionInfo, pad: f64) -> Insets {
        let extra = self.rule_for(info).map(|r| r.forgive_extra).unwrap_or_default();
        Insets::uniform(pad).plus(extra)
    }
}
