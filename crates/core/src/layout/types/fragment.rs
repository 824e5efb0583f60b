//! Glyph fragments: the raw input of every clustering pass.

use serde::{Deserialize, Serialize};

use crate::utils::{BBox, HasBBox, Point};

/// A text item as delivered by the extraction backend, before validation.
///
/// Coordinates are already in content space; `text` may still carry
/// surrounding whitespace and `height` may be zero for layout-only items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGlyph {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

impl RawGlyph {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
        }
    }

    /// Origin of the item, the point tested against a capture rectangle.
    pub fn origin(&self) -> Point {
        (self.x, self.y)
    }
}

/// One validated piece of extracted text with its bounding box.
///
/// `text` is trimmed and non-empty, `height > 0`. Fragments are immutable
/// once built; the clustering stages only move them between containers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphFragment {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: String,
}

impl GlyphFragment {
    /// Validates and builds a fragment. Returns `None` for whitespace-only
    /// text or a non-positive height.
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || height.is_nan() || height <= 0.0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
            text: text.to_string(),
        })
    }

    pub fn from_raw(raw: &RawGlyph) -> Option<Self> {
        Self::new(raw.x, raw.y, raw.width, raw.height, &raw.text)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl HasBBox for GlyphFragment {
    fn x0(&self) -> f64 {
        self.x
    }
    fn top(&self) -> f64 {
        self.y
    }
    fn x1(&self) -> f64 {
        self.x + self.width
    }
    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn bbox(&self) -> BBox {
        BBox::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}
