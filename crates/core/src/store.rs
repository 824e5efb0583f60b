//! Collaborator seams at the edges of the core: where glyphs come from and
//! where accepted markers go.

use serde::{Deserialize, Serialize};

use crate::collision::{MarkerIndex, min_distance_for_dot_size};
use crate::error::Result;
use crate::layout::{Marker, RawGlyph};
use crate::utils::Point;

/// Supplies the text items of the active page, already in content space.
pub trait GlyphSource {
    /// # Errors
    /// Backend failures are reported as `ScrapeError::Extraction`.
    fn page_glyphs(&self) -> Result<Vec<RawGlyph>>;
}

impl GlyphSource for [RawGlyph] {
    fn page_glyphs(&self) -> Result<Vec<RawGlyph>> {
        Ok(self.to_vec())
    }
}

impl GlyphSource for Vec<RawGlyph> {
    fn page_glyphs(&self) -> Result<Vec<RawGlyph>> {
        Ok(self.clone())
    }
}

/// Owns placed markers for the active page and the proximity threshold.
pub trait AnnotationStore {
    fn placed_centroids(&self) -> Vec<Point>;

    /// Placements closer than this to an existing marker are rejected.
    fn min_distance(&self) -> f64;

    /// Commits a batch of markers. Called at most once per operation.
    fn place_markers(&mut self, markers: Vec<Marker>);

    /// Collision index over the markers placed so far.
    fn collision_index(&self) -> MarkerIndex {
        MarkerIndex::with_centroids(self.placed_centroids(), self.min_distance())
    }
}

fn default_dot_size() -> f64 {
    1.0
}

/// In-memory marker list for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStore {
    #[serde(rename = "dotSize", default = "default_dot_size")]
    pub dot_size: f64,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self {
            dot_size: default_dot_size(),
            markers: Vec::new(),
        }
    }
}

impl MarkerStore {
    pub fn new(dot_size: f64) -> Self {
        Self {
            dot_size,
            markers: Vec::new(),
        }
    }
}

impl AnnotationStore for MarkerStore {
    fn placed_centroids(&self) -> Vec<Point> {
        self.markers.iter().map(Marker::position).collect()
    }

    fn min_distance(&self) -> f64 {
        min_distance_for_dot_size(self.dot_size)
    }

    fn place_markers(&mut self, markers: Vec<Marker>) {
        self.markers.extend(markers);
    }
}
