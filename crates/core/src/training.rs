//! Tolerance training.
//!
//! The user draws one region box, then five example boxes inside it, each
//! around a single label. Gaps measured inside the examples become the new
//! tolerance profile.
//!
//! ```text
//! Idle --toggle--> CollectingRegion --region--> CollectingSamples(0..4)
//!   ^                                                  | 5th example
//!   +------------------ compute / cancel ---- ReadyToCompute
//! ```

use std::mem;

use tracing::{debug, info, warn};

use crate::error::{Result, ScrapeError};
use crate::layout::{GlyphFragment, LineAnchor, ToleranceProfile, group_lines};
use crate::utils::{BBox, HasBBox, Point};

/// Number of example boxes a training session collects.
pub const SAMPLE_COUNT: usize = 5;

/// Horizontal tolerance used when no example yields a horizontal gap.
pub const FALLBACK_HORIZONTAL: f64 = 5.0;

/// Vertical tolerance used when no example yields a vertical gap.
pub const FALLBACK_VERTICAL: f64 = 25.0;

/// Counter label shown once all examples are in.
pub const READY_LABEL: &str = "PRESS ME WHEN READY!";

/// Where a training session stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrainerState {
    #[default]
    Idle,
    CollectingRegion,
    /// Holds fewer than `SAMPLE_COUNT` examples.
    CollectingSamples { region: BBox, samples: Vec<BBox> },
    ReadyToCompute {
        region: BBox,
        samples: [BBox; SAMPLE_COUNT],
    },
}

impl TrainerState {
    pub fn name(&self) -> &'static str {
        match self {
            TrainerState::Idle => "idle",
            TrainerState::CollectingRegion => "collecting region",
            TrainerState::CollectingSamples { .. } => "collecting samples",
            TrainerState::ReadyToCompute { .. } => "ready to compute",
        }
    }
}

/// Result of adding an example box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleProgress {
    pub count: usize,
    pub ready: bool,
}

/// Interactive state machine deriving a `ToleranceProfile` from examples.
#[derive(Debug, Clone, Default)]
pub struct ToleranceTrainer {
    state: TrainerState,
    anchor: LineAnchor,
}

impl ToleranceTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trainer grouping lines with a specific anchoring strategy.
    pub fn with_anchor(anchor: LineAnchor) -> Self {
        Self {
            state: TrainerState::Idle,
            anchor,
        }
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    /// True in every state but `Idle`.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, TrainerState::Idle)
    }

    /// Turns training mode on or off. Entering always starts from a clean
    /// sample set; leaving discards whatever was collected.
    ///
    /// Returns whether training mode is now on.
    pub fn toggle(&mut self) -> bool {
        self.state = match self.state {
            TrainerState::Idle => TrainerState::CollectingRegion,
            _ => TrainerState::Idle,
        };
        debug!(state = self.state.name(), "training mode toggled");
        self.is_active()
    }

    /// Discards the sample set and returns to `Idle`.
    pub fn cancel(&mut self) {
        self.state = TrainerState::Idle;
    }

    /// Records the outer region box from a drag between two corners.
    pub fn draw_region(&mut self, start: Point, end: Point) -> Result<()> {
        match self.state {
            TrainerState::CollectingRegion => {
                self.state = TrainerState::CollectingSamples {
                    region: BBox::from_corners(start, end),
                    samples: Vec::with_capacity(SAMPLE_COUNT),
                };
                Ok(())
            }
            _ => Err(self.invalid("draw a region box")),
        }
    }

    /// Records an example box from a drag between two corners.
    ///
    /// The drag must start inside the region box; its end is clamped to the
    /// region, so an example never extends outside it.
    pub fn draw_example(&mut self, start: Point, end: Point) -> Result<SampleProgress> {
        let state = self.state.name();
        let TrainerState::CollectingSamples { region, samples } = &mut self.state else {
            return Err(ScrapeError::InvalidTransition {
                state,
                action: "draw an example box",
            });
        };
        if !region.contains_point(start) {
            return Err(ScrapeError::ExampleOutsideRegion);
        }
        samples.push(BBox::from_corners(start, region.clamp_point(end)));

        let count = samples.len();
        if count == SAMPLE_COUNT {
            let region = *region;
            let Ok(samples) = <[BBox; SAMPLE_COUNT]>::try_from(mem::take(samples)) else {
                return Err(ScrapeError::InvalidTransition {
                    state,
                    action: "complete the sample set",
                });
            };
            self.state = TrainerState::ReadyToCompute { region, samples };
        }
        Ok(SampleProgress {
            count,
            ready: count == SAMPLE_COUNT,
        })
    }

    /// Number of example boxes collected in the current session.
    pub fn sample_count(&self) -> usize {
        match &self.state {
            TrainerState::CollectingSamples { samples, .. } => samples.len(),
            TrainerState::ReadyToCompute { .. } => SAMPLE_COUNT,
            _ => 0,
        }
    }

    /// Text for the counter shown on the region box: `n/5`, then the ready
    /// prompt. `None` before a region exists.
    pub fn progress_label(&self) -> Option<String> {
        match &self.state {
            TrainerState::CollectingSamples { samples, .. } => {
                Some(format!("{}/{}", samples.len(), SAMPLE_COUNT))
            }
            TrainerState::ReadyToCompute { .. } => Some(READY_LABEL.to_string()),
            _ => None,
        }
    }

    /// Runs the calibration over the collected examples.
    ///
    /// Only accepted in `ReadyToCompute`. Whatever the result, the session
    /// ends and the trainer is back in `Idle`; the caller decides whether to
    /// store the returned profile.
    pub fn compute(&mut self, fragments: &[GlyphFragment]) -> Result<ToleranceProfile> {
        match mem::take(&mut self.state) {
            TrainerState::ReadyToCompute { samples, .. } => {
                calibrate(&samples, fragments, self.anchor)
            }
            other => {
                self.state = other;
                Err(self.invalid("compute tolerances"))
            }
        }
    }

    /// True once all example boxes are in.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TrainerState::ReadyToCompute { .. })
    }

    pub(crate) fn invalid(&self, action: &'static str) -> ScrapeError {
        ScrapeError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

/// Gap measurements taken inside one example box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapSamples {
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
}

impl GapSamples {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    fn extend(&mut self, other: GapSamples) {
        self.horizontal.extend(other.horizontal);
        self.vertical.extend(other.vertical);
    }
}

/// Measures the positive gaps between the fragments overlapping `example`.
///
/// Vertical: lines ordered by their first fragment's y; the gap is from the
/// bottom of that fragment to the first fragment of the next line.
/// Horizontal: within each line in x order, right edge to next left edge.
pub fn collect_gap_samples(
    example: &BBox,
    fragments: &[GlyphFragment],
    anchor: LineAnchor,
) -> GapSamples {
    let selected = fragments
        .iter()
        .filter(|f| f.bbox().overlaps(example))
        .cloned();
    let mut lines = group_lines(selected, anchor);
    lines.sort_by(|a, b| {
        a.anchor()
            .y()
            .partial_cmp(&b.anchor().y())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut samples = GapSamples::default();
    for pair in lines.windows(2) {
        let (upper, lower) = (pair[0].anchor(), pair[1].anchor());
        let gap = (lower.y() - (upper.y() + upper.height())).abs();
        if gap > 0.0 {
            samples.vertical.push(gap);
        }
    }
    for line in &lines {
        for pair in line.sorted_by_x().windows(2) {
            let gap = pair[1].x() - (pair[0].x() + pair[0].width());
            if gap > 0.0 {
                samples.horizontal.push(gap);
            }
        }
    }
    samples
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Derives a profile from example boxes.
///
/// Each axis is the mean of every gap sample across all examples, falling
/// back to `FALLBACK_HORIZONTAL` / `FALLBACK_VERTICAL` when that axis has no
/// samples.
///
/// # Errors
/// `NoGapSamples` when neither axis produced a single sample.
pub fn calibrate(
    examples: &[BBox],
    fragments: &[GlyphFragment],
    anchor: LineAnchor,
) -> Result<ToleranceProfile> {
    let mut all = GapSamples::default();
    for example in examples {
        all.extend(collect_gap_samples(example, fragments, anchor));
    }

    if all.is_empty() {
        warn!(examples = examples.len(), "no gap samples in training boxes");
        return Err(ScrapeError::NoGapSamples);
    }

    let profile = ToleranceProfile {
        horizontal: mean(&all.horizontal).unwrap_or(FALLBACK_HORIZONTAL),
        vertical: mean(&all.vertical).unwrap_or(FALLBACK_VERTICAL),
    };
    info!(
        horizontal_samples = all.horizontal.len(),
        vertical_samples = all.vertical.len(),
        %profile,
        "calibrated tolerances"
    );
    Ok(profile)
}
