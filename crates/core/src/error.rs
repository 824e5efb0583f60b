//! Error types for the labelscrape clustering core.

use thiserror::Error;

/// Primary error type for scrape, training and automap operations.
///
/// User-visible outcomes such as "no text in selection" or "everything
/// collided" are not errors; they are reported through
/// [`ScrapeOutcome`](crate::pipeline::ScrapeOutcome) and
/// [`AutomapOutcome`](crate::automap::AutomapOutcome).
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("glyph extraction failed: {0}")]
    Extraction(String),

    #[error("no valid text found in training boxes")]
    NoGapSamples,

    #[error("cannot {action} while trainer is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("example box must start inside the region box")]
    ExampleOutsideRegion,

    #[error("invalid {axis} tolerance: {value}")]
    InvalidTolerance { axis: &'static str, value: f64 },

    #[error("scraping is unavailable while training mode is active")]
    TrainingActive,

    #[error("search term is empty")]
    EmptySearchTerm,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias for ScrapeError.
pub type Result<T> = std::result::Result<T, ScrapeError>;
