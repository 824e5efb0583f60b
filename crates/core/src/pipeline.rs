//! Capture-rectangle scrape.
//!
//! One operation takes a rectangle drawn in view space through the whole
//! chain: glyph selection, line grouping, clustering, collision checks and a
//! single commit to the annotation store. Status updates are emitted at every
//! phase boundary.

use tracing::debug;

use crate::collision::{GuardedBatch, MarkerIndex, guard_clusters};
use crate::error::Result;
use crate::layout::{
    Cluster, GlyphFragment, Marker, RawGlyph, ScrapeOptions, ToleranceProfile, cluster_fragments,
};
use crate::progress::{ProgressSink, StatusUpdate};
use crate::store::{AnnotationStore, GlyphSource};
use crate::utils::{BBox, Point, ViewTransform};

/// Everything a scrape reads besides its inputs. Passed explicitly; the core
/// holds no ambient state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeContext {
    pub profile: ToleranceProfile,
    pub transform: ViewTransform,
    pub options: ScrapeOptions,
}

/// User-visible result of a scrape that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// No usable text item inside the capture rectangle.
    NoFragments,
    /// Text was found but produced no cluster.
    NoClusters,
    /// Every cluster landed on an existing marker.
    AllCollided { clusters: usize },
    /// At least one marker was placed; `rejected` clusters were skipped.
    Placed { markers: Vec<Marker>, rejected: usize },
}

impl ScrapeOutcome {
    pub fn placed(&self) -> usize {
        match self {
            ScrapeOutcome::Placed { markers, .. } => markers.len(),
            _ => 0,
        }
    }
}

/// Selects the glyphs whose origin lies inside `region` and validates them.
///
/// Scans in batches of `batch_size`, reporting progress before each batch.
pub fn collect_fragments<P>(
    glyphs: &[RawGlyph],
    region: &BBox,
    batch_size: usize,
    progress: &mut P,
) -> Vec<GlyphFragment>
where
    P: ProgressSink + ?Sized,
{
    let total = glyphs.len();
    let mut fragments = Vec::new();
    for (i, batch) in glyphs.chunks(batch_size.max(1)).enumerate() {
        progress.report(StatusUpdate::working(format!(
            "Processing text items: {}/{}",
            i * batch_size.max(1),
            total
        )));
        fragments.extend(
            batch
                .iter()
                .filter(|g| region.contains_point(g.origin()))
                .filter_map(GlyphFragment::from_raw),
        );
    }
    fragments
}

/// Pure core: cluster `fragments` and guard the clusters against
/// `existing` centroids.
///
/// Returns the accepted markers (cluster order) and the rejected count.
pub fn cluster_and_guard(
    fragments: Vec<GlyphFragment>,
    profile: &ToleranceProfile,
    existing: &[Point],
    min_distance: f64,
    options: &ScrapeOptions,
) -> GuardedBatch {
    let clusters = cluster_fragments(fragments, profile, options.line_anchor);
    let mut index = MarkerIndex::with_centroids(existing.iter().copied(), min_distance);
    guard_clusters(&clusters, &mut index)
}

/// Scrapes the text under a capture rectangle into markers.
///
/// `capture` is in view space and is mapped to content space with the
/// context transform. Accepted markers are committed to `store` in one call
/// at the end; on error nothing is committed.
///
/// # Errors
/// Only a failing glyph source produces an error. Empty selections and
/// collisions are reported as a `ScrapeOutcome`.
pub fn scrape_region<S, A, P>(
    ctx: &ScrapeContext,
    capture: BBox,
    source: &S,
    store: &mut A,
    progress: &mut P,
) -> Result<ScrapeOutcome>
where
    S: GlyphSource + ?Sized,
    A: AnnotationStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    progress.report(StatusUpdate::working("Scraping, please wait..."));
    let region = ctx.transform.to_content_rect(capture);

    progress.report(StatusUpdate::working("Loading page text..."));
    let glyphs = match source.page_glyphs() {
        Ok(glyphs) => glyphs,
        Err(e) => {
            progress.report(StatusUpdate::failure("An error occurred during scrape."));
            return Err(e);
        }
    };

    let fragments = collect_fragments(&glyphs, &region, ctx.options.batch_size, progress);
    debug!(
        page_items = glyphs.len(),
        fragments = fragments.len(),
        "selected text items"
    );
    if fragments.is_empty() {
        progress.report(StatusUpdate::failure("No Live Text Found"));
        return Ok(ScrapeOutcome::NoFragments);
    }

    progress.report(StatusUpdate::working("Clustering text..."));
    let clusters = cluster_fragments(fragments, &ctx.profile, ctx.options.line_anchor);
    if clusters.is_empty() {
        progress.report(StatusUpdate::failure("No text clusters found in selection"));
        return Ok(ScrapeOutcome::NoClusters);
    }

    progress.report(StatusUpdate::working("Adding dots to data..."));
    let mut index = store.collision_index();
    let batch = guard_clusters(&clusters, &mut index);
    Ok(commit(&clusters, batch, store, progress))
}

fn commit<A, P>(
    clusters: &[Cluster],
    batch: GuardedBatch,
    store: &mut A,
    progress: &mut P,
) -> ScrapeOutcome
where
    A: AnnotationStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    let GuardedBatch { accepted, rejected } = batch;
    if accepted.is_empty() {
        let message = if clusters.len() == 1 {
            "Collision detected"
        } else {
            "No valid locations found (all collided)"
        };
        progress.report(StatusUpdate::failure(message));
        return ScrapeOutcome::AllCollided {
            clusters: clusters.len(),
        };
    }

    let message = if clusters.len() == 1 {
        format!("Scraped: \"{}\"", accepted[0].text)
    } else {
        format!("Scraped {} locations", accepted.len())
    };
    store.place_markers(accepted.clone());
    progress.report(StatusUpdate::success(message));
    ScrapeOutcome::Placed {
        markers: accepted,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::progress::{NoProgress, StatusKind};
    use crate::store::MarkerStore;

    struct FailingSource;

    impl GlyphSource for FailingSource {
        fn page_glyphs(&self) -> Result<Vec<RawGlyph>> {
            Err(ScrapeError::Extraction("backend closed".to_string()))
        }
    }

    #[test]
    fn batches_report_progress() {
        let glyphs: Vec<RawGlyph> = (0..250)
            .map(|i| RawGlyph::new(i as f64, 0.0, 1.0, 1.0, "x"))
            .collect();
        let mut messages = Vec::new();
        let mut sink = |u: StatusUpdate| messages.push(u.message);
        let region = BBox::new(0.0, 0.0, 99.0, 10.0);
        let fragments = collect_fragments(&glyphs, &region, 100, &mut sink);

        assert_eq!(fragments.len(), 100);
        assert_eq!(
            messages,
            vec![
                "Processing text items: 0/250",
                "Processing text items: 100/250",
                "Processing text items: 200/250",
            ]
        );
    }

    #[test]
    fn selection_tests_origin_and_drops_blank_items() {
        let glyphs = vec![
            RawGlyph::new(5.0, 5.0, 500.0, 10.0, "wide but inside"),
            RawGlyph::new(-1.0, 5.0, 10.0, 10.0, "starts outside"),
            RawGlyph::new(6.0, 6.0, 10.0, 10.0, "   "),
            RawGlyph::new(7.0, 7.0, 10.0, 0.0, "flat"),
        ];
        let region = BBox::new(0.0, 0.0, 50.0, 50.0);
        let fragments = collect_fragments(&glyphs, &region, 100, &mut NoProgress);
        let texts: Vec<&str> = fragments.iter().map(GlyphFragment::text).collect();
        assert_eq!(texts, vec!["wide but inside"]);
    }

    #[test]
    fn extraction_failure_commits_nothing() {
        let mut store = MarkerStore::default();
        let mut kinds = Vec::new();
        let mut sink = |u: StatusUpdate| kinds.push(u.kind);
        let result = scrape_region(
            &ScrapeContext::default(),
            BBox::new(0.0, 0.0, 100.0, 100.0),
            &FailingSource,
            &mut store,
            &mut sink,
        );
        assert!(matches!(result, Err(ScrapeError::Extraction(_))));
        assert!(store.markers.is_empty());
        assert_eq!(kinds.last(), Some(&StatusKind::Failure));
    }

    #[test]
    fn empty_capture_reports_no_fragments() {
        let glyphs = vec![RawGlyph::new(500.0, 500.0, 10.0, 10.0, "far away")];
        let mut store = MarkerStore::default();
        let outcome = scrape_region(
            &ScrapeContext::default(),
            BBox::new(0.0, 0.0, 100.0, 100.0),
            &glyphs,
            &mut store,
            &mut NoProgress,
        )
        .unwrap();
        assert_eq!(outcome, ScrapeOutcome::NoFragments);
    }

    #[test]
    fn capture_is_mapped_through_view_transform() {
        let glyphs = vec![RawGlyph::new(10.0, 100.0, 30.0, 10.0, "ROOM")];
        let ctx = ScrapeContext {
            transform: ViewTransform::new(50.0, 50.0, 2.0),
            ..ScrapeContext::default()
        };
        let mut store = MarkerStore::default();
        // View (60, 240)..(140, 300) is content (5, 95)..(45, 125).
        let outcome = scrape_region(
            &ctx,
            BBox::new(60.0, 240.0, 140.0, 300.0),
            &glyphs,
            &mut store,
            &mut NoProgress,
        )
        .unwrap();
        assert_eq!(outcome.placed(), 1);
        assert_eq!(store.markers, vec![Marker::new(25.0, 105.0, "ROOM")]);
    }
}
