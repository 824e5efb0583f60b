//! labelscrape - turn glyph positions under a capture rectangle into
//! labelled location markers.
//!
//! The pipeline groups glyph fragments into rows, merges rows into label
//! clusters under a calibrated two-axis tolerance, and guards against placing
//! a marker on top of an existing one. A small training state machine derives
//! the tolerance from user-drawn examples.

pub mod automap;
pub mod collision;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod store;
pub mod training;
pub mod utils;

pub use automap::{AutomapOutcome, MatchMode, automap_page};
pub use collision::{CollisionGuard, GuardedBatch, MarkerIndex, guard_clusters};
pub use error::{Result, ScrapeError};
pub use layout::{
    Cluster, GlyphFragment, LineAnchor, Marker, RawGlyph, ScrapeOptions, TextLine,
    ToleranceProfile, build_clusters, cluster_fragments, group_lines,
};
pub use pipeline::{ScrapeContext, ScrapeOutcome, cluster_and_guard, scrape_region};
pub use progress::{ProgressSink, StatusKind, StatusUpdate};
pub use session::ScrapeSession;
pub use store::{AnnotationStore, GlyphSource, MarkerStore};
pub use training::{ToleranceTrainer, TrainerState, calibrate};
pub use utils::{BBox, Point, ViewTransform};
