//! Text lines: fragments judged to occupy the same row.

use crate::utils::{HasBBox, INF_F64};

use super::fragment::GlyphFragment;

/// A bag of fragments assigned to one row by the line grouper.
///
/// Only exists for the duration of a grouping pass. Fragments are kept in
/// insertion order; horizontal ordering is left to the consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// y against which new members are compared.
    reference_y: f64,
    fragments: Vec<GlyphFragment>,
}

impl TextLine {
    pub fn new(first: GlyphFragment) -> Self {
        Self {
            reference_y: first.y(),
            fragments: vec![first],
        }
    }

    pub fn reference_y(&self) -> f64 {
        self.reference_y
    }

    pub(crate) fn set_reference_y(&mut self, y: f64) {
        self.reference_y = y;
    }

    pub fn push(&mut self, frag: GlyphFragment) {
        self.fragments.push(frag);
    }

    /// The first fragment ever added. Lines are never empty.
    pub fn anchor(&self) -> &GlyphFragment {
        &self.fragments[0]
    }

    pub fn fragments(&self) -> &[GlyphFragment] {
        &self.fragments
    }

    /// Fragments in left-to-right order. Stable, so equal x keeps insertion order.
    pub fn sorted_by_x(&self) -> Vec<&GlyphFragment> {
        let mut sorted: Vec<&GlyphFragment> = self.fragments.iter().collect();
        sorted.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Mean of member y values.
    pub fn mean_y(&self) -> f64 {
        self.fragments.iter().map(GlyphFragment::y).sum::<f64>() / self.fragments.len() as f64
    }
}

impl HasBBox for TextLine {
    fn x0(&self) -> f64 {
        self.fragments.iter().map(|f| f.x0()).fold(INF_F64, f64::min)
    }
    fn top(&self) -> f64 {
        self.fragments.iter().map(|f| f.top()).fold(INF_F64, f64::min)
    }
    fn x1(&self) -> f64 {
        self.fragments.iter().map(|f| f.x1()).fold(-INF_F64, f64::max)
    }
    fn bottom(&self) -> f64 {
        self.fragments
            .iter()
            .map(|f| f.bottom())
            .fold(-INF_F64, f64::max)
    }
}
