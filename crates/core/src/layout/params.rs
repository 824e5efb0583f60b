//! Clustering parameters.
//!
//! Contains the calibrated `ToleranceProfile`, the line anchoring strategy and
//! the fixed constants of the grouping stage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Two fragments whose y differs by at most this many pixels share a row.
/// Never affected by the tolerance profile.
pub const LINE_BAND: f64 = 5.0;

pub const DEFAULT_HORIZONTAL_TOLERANCE: f64 = 1.0;
pub const DEFAULT_VERTICAL_TOLERANCE: f64 = 25.0;

/// Default number of raw glyphs scanned between progress reports.
pub const DEFAULT_BATCH_SIZE: usize = 100;

fn default_horizontal() -> f64 {
    DEFAULT_HORIZONTAL_TOLERANCE
}

fn default_vertical() -> f64 {
    DEFAULT_VERTICAL_TOLERANCE
}

/// Calibrated merge thresholds.
///
/// Both values are pixels at the fixed internal rendering scale of the page,
/// so they are not resolution independent. A host that changes that scale
/// must retrain or rescale the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceProfile {
    /// Largest horizontal gap between neighbouring fragments (and between
    /// stacked line extents) that still merges.
    #[serde(rename = "scrapeHorizontalTolerance", default = "default_horizontal")]
    pub horizontal: f64,

    /// Largest vertical gap between lines that still merges.
    #[serde(rename = "scrapeVerticalTolerance", default = "default_vertical")]
    pub vertical: f64,
}

impl Default for ToleranceProfile {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_HORIZONTAL_TOLERANCE,
            vertical: DEFAULT_VERTICAL_TOLERANCE,
        }
    }
}

impl ToleranceProfile {
    /// Creates a profile from manually entered values.
    ///
    /// # Errors
    /// Returns `InvalidTolerance` when either value is negative or not finite.
    pub fn new(horizontal: f64, vertical: f64) -> Result<Self> {
        check_tolerance("horizontal", horizontal)?;
        check_tolerance("vertical", vertical)?;
        Ok(Self {
            horizontal,
            vertical,
        })
    }
}

fn check_tolerance(axis: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScrapeError::InvalidTolerance { axis, value })
    }
}

impl fmt::Display for ToleranceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H={:.1}, V={:.1}", self.horizontal, self.vertical)
    }
}

/// How a line decides whether a new fragment belongs to its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineAnchor {
    /// Compare against the y of the first fragment ever added. The band never
    /// re-centres, so a staircase of fragments can drift past `LINE_BAND`
    /// from where the line started.
    #[default]
    FirstMember,
    /// Compare against the mean y of the current members.
    RunningMean,
}

/// Per-operation knobs that are not part of the calibrated profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOptions {
    pub line_anchor: LineAnchor,
    /// Raw glyphs scanned between progress reports. Zero is treated as one.
    pub batch_size: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            line_anchor: LineAnchor::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
