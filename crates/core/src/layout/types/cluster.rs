//! Clusters and the marker projection handed to the annotation store.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::utils::{BBox, HasBBox, Point, bbox_union};

use super::fragment::GlyphFragment;

/// One or more lines merged into a single semantic label.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    fragments: Vec<GlyphFragment>,
    bbox: BBox,
    text: String,
}

impl Cluster {
    /// Builds a cluster from fragments already in reading order. Returns
    /// `None` for an empty list.
    pub fn from_fragments(fragments: Vec<GlyphFragment>) -> Option<Self> {
        let bbox = bbox_union(fragments.iter().map(HasBBox::bbox))?;
        let text = fragments.iter().map(GlyphFragment::text).join(" ").trim().to_string();
        Some(Self {
            fragments,
            bbox,
            text,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> &[GlyphFragment] {
        &self.fragments
    }

    /// Centre of the union of the member bounding boxes.
    pub fn center(&self) -> Point {
        self.bbox.center()
    }

    pub fn center_x(&self) -> f64 {
        self.center().0
    }

    pub fn center_y(&self) -> f64 {
        self.center().1
    }

    pub fn to_marker(&self) -> Marker {
        let (x, y) = self.center();
        Marker::new(x, y, self.text.clone())
    }
}

impl HasBBox for Cluster {
    fn x0(&self) -> f64 {
        self.bbox.x0
    }
    fn top(&self) -> f64 {
        self.bbox.top
    }
    fn x1(&self) -> f64 {
        self.bbox.x1
    }
    fn bottom(&self) -> f64 {
        self.bbox.bottom
    }
}

/// The `(x, y, text)` projection of a cluster that survives into the
/// annotation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl Marker {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    pub fn position(&self) -> Point {
        (self.x, self.y)
    }
}
