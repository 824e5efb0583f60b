//! Line-to-cluster merging.
//!
//! Turns the rows produced by the line grouper into label clusters using the
//! two-axis tolerance profile:
//! - within a row, neighbouring fragments whose horizontal gap is at most
//!   `horizontal` form one run
//! - across rows, a run joins an earlier cluster when the vertical gap is at
//!   most `vertical` and the horizontal extents overlap or sit within
//!   `horizontal` of each other

use tracing::debug;

use crate::utils::{BBox, HasBBox};

use super::super::params::{LineAnchor, ToleranceProfile};
use super::super::types::{Cluster, GlyphFragment, TextLine};
use super::grouping::group_lines;

/// Fragments of one cluster under construction, with their running extent.
struct PendingCluster {
    fragments: Vec<GlyphFragment>,
    bbox: BBox,
}

impl PendingCluster {
    fn new(fragments: Vec<GlyphFragment>, bbox: BBox) -> Self {
        Self { fragments, bbox }
    }

    fn absorb(&mut self, run: PendingCluster) {
        self.bbox = self.bbox.union(&run.bbox);
        self.fragments.extend(run.fragments);
    }

    fn accepts(&self, run: &PendingCluster, profile: &ToleranceProfile) -> bool {
        self.bbox.vgap(&run.bbox) <= profile.vertical
            && self.bbox.hgap(&run.bbox) <= profile.horizontal
    }
}

/// Splits one row into runs of horizontally adjacent fragments.
///
/// The gap is measured from the right edge of the previous fragment in x
/// order to the left edge of the next one.
fn split_runs(line: &TextLine, horizontal: f64) -> Vec<PendingCluster> {
    let mut runs: Vec<PendingCluster> = Vec::new();
    let mut current: Vec<GlyphFragment> = Vec::new();
    let mut current_bbox: Option<BBox> = None;

    for frag in line.sorted_by_x() {
        if let Some(last) = current.last() {
            let gap = frag.x0() - last.x1();
            if gap > horizontal {
                if let Some(bbox) = current_bbox.take() {
                    runs.push(PendingCluster::new(std::mem::take(&mut current), bbox));
                }
            }
        }
        current_bbox = Some(match current_bbox {
            Some(bbox) => bbox.union(&frag.bbox()),
            None => frag.bbox(),
        });
        current.push(frag.clone());
    }
    if let Some(bbox) = current_bbox {
        runs.push(PendingCluster::new(current, bbox));
    }
    runs
}

/// Merges lines into label clusters.
///
/// # Algorithm
/// 1. Order lines by reference y (stable)
/// 2. Split each line into runs with `split_runs`
/// 3. Walk the runs in reading order; each run joins the first existing
///    cluster that accepts it, otherwise it seeds a new cluster
///
/// Merging is greedy and first-match, so the output only depends on the
/// input order and the profile. Cluster text lists fragments top line first,
/// left to right within a line.
pub fn build_clusters(lines: &[TextLine], profile: &ToleranceProfile) -> Vec<Cluster> {
    let mut ordered: Vec<&TextLine> = lines.iter().collect();
    ordered.sort_by(|a, b| {
        a.reference_y()
            .partial_cmp(&b.reference_y())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut pending: Vec<PendingCluster> = Vec::new();
    let mut run_count = 0usize;
    for line in ordered {
        for run in split_runs(line, profile.horizontal) {
            run_count += 1;
            match pending.iter_mut().find(|c| c.accepts(&run, profile)) {
                Some(cluster) => cluster.absorb(run),
                None => pending.push(run),
            }
        }
    }

    let clusters: Vec<Cluster> = pending
        .into_iter()
        .filter_map(|c| Cluster::from_fragments(c.fragments))
        .filter(|c| !c.text().is_empty())
        .collect();

    debug!(
        lines = lines.len(),
        runs = run_count,
        clusters = clusters.len(),
        "clustered text lines"
    );
    clusters
}

/// Convenience wrapper: group fragments into lines, then build clusters.
pub fn cluster_fragments<I>(
    fragments: I,
    profile: &ToleranceProfile,
    anchor: LineAnchor,
) -> Vec<Cluster>
where
    I: IntoIterator<Item = GlyphFragment>,
{
    let lines = group_lines(fragments, anchor);
    build_clusters(&lines, profile)
}
