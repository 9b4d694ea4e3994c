//! Destination catalogue: which label names the map knows, where each one
//! navigates, what the region is called for assistive tech, and the aliases
//! external triggers may use to name it.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// One navigable map destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Upper-case name matched against label text, e.g. `"PIEDMONT"`.
    pub key: String,
    /// Path for a full top-level navigation.
    pub path: String,
    /// Accessible name applied to the region.
    pub aria_label: String,
    /// Normalized class tokens that name this destination on external triggers.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Fallback location as a fraction of the view box, used when no label
    /// can be tied to a region.
    #[serde(default)]
    pub geo_anchor: Option<Point>,
}

impl Destination {
    fn new(key: &str, path: &str, aria_label: &str, aliases: &[&str], anchor: (f64, f64)) -> Self {
        Self {
            key: key.to_owned(),
            path: path.to_owned(),
            aria_label: aria_label.to_owned(),
            aliases: aliases.iter().map(|a| (*a).to_owned()).collect(),
            geo_anchor: Some(Point::new(anchor.0, anchor.1)),
        }
    }
}

/// Ordered list of destinations. Lookups return the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<Destination>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: vec![
                Destination::new("PIEDMONT", "/piedmont", "Piedmont region", &["piedmont"], (0.22, 0.23)),
                Destination::new("LOMBARDIA", "/lombardia", "Lombardia region", &["lombardy", "lombardia"], (0.33, 0.21)),
                Destination::new("VENETO", "/veneto", "Veneto region", &["veneto"], (0.47, 0.22)),
                Destination::new("TUSCANY", "/tuscany", "Tuscany region", &["tuscany", "toscana"], (0.36, 0.43)),
                Destination::new("FRIULI", "/friuli", "Friuli region", &["friuli", "friuli-venezia-giulia"], (0.58, 0.21)),
                Destination::new("PUGLIA", "/puglia", "Puglia region", &["puglia", "apulia"], (0.69, 0.63)),
            ],
        }
    }
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<Destination>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[Destination] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Destination> {
        self.entries.iter().find(|d| d.key == key)
    }

    /// First destination whose key occurs in `text`, ignoring case.
    #[must_use]
    pub fn match_label(&self, text: &str) -> Option<&Destination> {
        let upper = text.to_uppercase();
        self.entries.iter().find(|d| upper.contains(&d.key.to_uppercase()))
    }

    /// Whether `text` names any destination.
    #[must_use]
    pub fn names_any(&self, text: &str) -> bool {
        self.match_label(text.trim()).is_some()
    }

    /// Destination named by a raw class token on an external trigger.
    #[must_use]
    pub fn match_token(&self, raw: &str) -> Option<&Destination> {
        let token = normalize_token(raw);
        if token.is_empty() {
            return None;
        }
        self.entries.iter().find(|d| d.aliases.iter().any(|a| *a == token))
    }
}

/// Lower-case `raw`, collapse every run of non-alphanumerics to `-`, and
/// strip leading and trailing dashes.
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}
