//! Page-wide text search placement.
//!
//! Finds every text item on the page containing a search term, clusters the
//! hits with the current profile and places one marker per cluster that
//! passes the collision guard.

use tracing::debug;

use crate::collision::CollisionGuard;
use crate::error::{Result, ScrapeError};
use crate::layout::{GlyphFragment, Marker, cluster_fragments};
use crate::pipeline::ScrapeContext;
use crate::progress::{ProgressSink, StatusUpdate};
use crate::store::{AnnotationStore, GlyphSource};

/// How hits are turned into marker labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Keep only clusters whose full text contains the term; label with the
    /// term as typed.
    ExactPhrase,
    /// Keep every cluster of matching items; label with the cluster text.
    #[default]
    Contains,
}

/// Result of an automap run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AutomapOutcome {
    /// The page carries no text items at all.
    NoText,
    Completed {
        markers: Vec<Marker>,
        collided: usize,
    },
}

impl AutomapOutcome {
    pub fn placed(&self) -> usize {
        match self {
            AutomapOutcome::Completed { markers, .. } => markers.len(),
            AutomapOutcome::NoText => 0,
        }
    }
}

/// Collapses whitespace runs to single spaces and lowercases.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Searches the page for `term` and places markers on the hits.
///
/// # Errors
/// `EmptySearchTerm` for a blank term, or the glyph source's error. Nothing
/// is committed on error.
pub fn automap_page<S, A, P>(
    ctx: &ScrapeContext,
    term: &str,
    mode: MatchMode,
    source: &S,
    store: &mut A,
    progress: &mut P,
) -> Result<AutomapOutcome>
where
    S: GlyphSource + ?Sized,
    A: AnnotationStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    let term = term.trim();
    if term.is_empty() {
        return Err(ScrapeError::EmptySearchTerm);
    }
    let needle = normalize_term(term);

    progress.report(StatusUpdate::working("Loading page content..."));
    let glyphs = match source.page_glyphs() {
        Ok(glyphs) => glyphs,
        Err(e) => {
            progress.report(StatusUpdate::failure("An error occurred during automap."));
            return Err(e);
        }
    };
    if glyphs.is_empty() {
        progress.report(StatusUpdate::failure("No live text found on this page."));
        return Ok(AutomapOutcome::NoText);
    }

    progress.report(StatusUpdate::working(format!(
        "Finding matches among {} text items...",
        glyphs.len()
    )));
    let hits: Vec<GlyphFragment> = glyphs
        .iter()
        .filter_map(GlyphFragment::from_raw)
        .filter(|f| f.text().to_lowercase().contains(&needle))
        .collect();
    debug!(term, hits = hits.len(), "automap matches");

    let clusters = cluster_fragments(hits, &ctx.profile, ctx.options.line_anchor);
    let mut index = store.collision_index();
    let mut markers = Vec::new();
    let mut collided = 0usize;
    for cluster in &clusters {
        let label = match mode {
            MatchMode::ExactPhrase => {
                if !cluster.text().to_lowercase().contains(&needle) {
                    continue;
                }
                term.to_string()
            }
            MatchMode::Contains => cluster.text().to_string(),
        };
        let (x, y) = cluster.center();
        if index.is_too_close(x, y) {
            debug!(label = %label, "collision detected, skipping");
            collided += 1;
            continue;
        }
        index.record(x, y);
        markers.push(Marker::new(x, y, label));
    }

    if markers.is_empty() {
        progress.report(StatusUpdate::failure("Completed: No matches found."));
    } else {
        progress.report(StatusUpdate::working("Placing dots..."));
        store.place_markers(markers.clone());
        progress.report(StatusUpdate::success(format!(
            "Completed: Found {} match(es)!",
            markers.len()
        )));
    }
    Ok(AutomapOutcome::Completed { markers, collided })
}
