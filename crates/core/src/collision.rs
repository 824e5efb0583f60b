//! Duplicate placement guard.
//!
//! A proposed marker is rejected when it lands too close to one already on
//! the page. The proximity threshold belongs to the annotation store; the
//! core only needs the `is_too_close` predicate.

use std::fmt;

use rstar::RTree;
use tracing::debug;

use crate::layout::{Cluster, Marker};
use crate::utils::Point;

/// Accept/reject predicate for marker positions.
pub trait CollisionGuard {
    /// True when a marker at `(x, y)` would sit too close to a known one.
    fn is_too_close(&self, x: f64, y: f64) -> bool;

    /// Remembers an accepted position so later candidates are checked
    /// against it as well.
    fn record(&mut self, x: f64, y: f64);
}

/// Minimum centre distance for markers drawn at `dot_size`.
pub fn min_distance_for_dot_size(dot_size: f64) -> f64 {
    20.0 * dot_size + 1.0
}

/// R-tree of placed marker centroids with a fixed rejection radius.
///
/// A candidate is too close when its Euclidean distance to the nearest
/// centroid is strictly below `min_distance`.
#[derive(Clone)]
pub struct MarkerIndex {
    tree: RTree<[f64; 2]>,
    min_distance: f64,
}

impl MarkerIndex {
    pub fn new(min_distance: f64) -> Self {
        Self {
            tree: RTree::new(),
            min_distance,
        }
    }

    /// Index sized for markers of the given dot size.
    pub fn for_dot_size(dot_size: f64) -> Self {
        Self::new(min_distance_for_dot_size(dot_size))
    }

    /// Bulk-loads existing centroids.
    pub fn with_centroids<I>(centroids: I, min_distance: f64) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let points: Vec<[f64; 2]> = centroids.into_iter().map(|(x, y)| [x, y]).collect();
        Self {
            tree: RTree::bulk_load(points),
            min_distance,
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl fmt::Debug for MarkerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerIndex")
            .field("markers", &self.len())
            .field("min_distance", &self.min_distance)
            .finish()
    }
}

impl CollisionGuard for MarkerIndex {
    fn is_too_close(&self, x: f64, y: f64) -> bool {
        let limit = self.min_distance * self.min_distance;
        self.tree.nearest_neighbor(&[x, y]).is_some_and(|p| {
            let dx = p[0] - x;
            let dy = p[1] - y;
            dx * dx + dy * dy < limit
        })
    }

    fn record(&mut self, x: f64, y: f64) {
        self.tree.insert([x, y]);
    }
}

/// Outcome of guarding one batch of clusters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardedBatch {
    /// Accepted markers, in cluster order.
    pub accepted: Vec<Marker>,
    /// Number of clusters dropped for landing too close.
    pub rejected: usize,
}

/// Checks every cluster independently against the guard.
///
/// Each accepted cluster is recorded before the next one is checked, so one
/// batch cannot stack two markers on the same spot. Rejected clusters are
/// never recorded and never block anything else.
pub fn guard_clusters<G>(clusters: &[Cluster], guard: &mut G) -> GuardedBatch
where
    G: CollisionGuard + ?Sized,
{
    let mut batch = GuardedBatch::default();
    for cluster in clusters {
        let (x, y) = cluster.center();
        if guard.is_too_close(x, y) {
            debug!(x, y, text = cluster.text(), "collision detected, skipping");
            batch.rejected += 1;
            continue;
        }
        guard.record(x, y);
        batch.accepted.push(cluster.to_marker());
    }
    batch
}
