//! Session state: the tolerance profile plus the interactive modes that read
//! and write it.
//!
//! Training and scraping never overlap. While the trainer is collecting boxes,
//! scrape and automap requests are refused, so every clustering run sees a
//! profile written by a completed training session.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::automap::{AutomapOutcome, MatchMode, automap_page};
use crate::error::{Result, ScrapeError};
use crate::layout::{GlyphFragment, ScrapeOptions, ToleranceProfile};
use crate::pipeline::{ScrapeContext, ScrapeOutcome, scrape_region};
use crate::progress::{ProgressSink, StatusUpdate};
use crate::store::{AnnotationStore, GlyphSource};
use crate::training::{SampleProgress, ToleranceTrainer};
use crate::utils::{BBox, Point, ViewTransform};

/// Long-lived state of one project session.
#[derive(Debug, Clone, Default)]
pub struct ScrapeSession {
    profile: ToleranceProfile,
    trainer: ToleranceTrainer,
    transform: ViewTransform,
    options: ScrapeOptions,
}

impl ScrapeSession {
    pub fn new(profile: ToleranceProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: ScrapeOptions) -> Self {
        self.trainer = ToleranceTrainer::with_anchor(options.line_anchor);
        self.options = options;
        self
    }

    /// Loads the profile persisted at `path`. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let profile: ToleranceProfile = serde_json::from_str(&data)?;
        debug!(path = %path.display(), %profile, "loaded session");
        Ok(Self::new(profile))
    }

    /// Persists the profile to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.profile)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn profile(&self) -> &ToleranceProfile {
        &self.profile
    }

    /// Manual override of the profile, e.g. from tolerance input fields.
    pub fn set_profile(&mut self, profile: ToleranceProfile) {
        self.profile = profile;
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    pub fn trainer(&self) -> &ToleranceTrainer {
        &self.trainer
    }

    /// Snapshot passed into every clustering operation.
    pub fn context(&self) -> ScrapeContext {
        ScrapeContext {
            profile: self.profile,
            transform: self.transform,
            options: self.options.clone(),
        }
    }

    fn ensure_not_training(&self) -> Result<()> {
        if self.trainer.is_active() {
            Err(ScrapeError::TrainingActive)
        } else {
            Ok(())
        }
    }

    /// Scrapes a capture rectangle drawn in view space.
    pub fn scrape<S, A, P>(
        &self,
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
        self.ensure_not_training()?;
        scrape_region(&self.context(), capture, source, store, progress)
    }

    /// Searches the whole page for `term`.
    pub fn automap<S, A, P>(
        &self,
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
        self.ensure_not_training()?;
        automap_page(&self.context(), term, mode, source, store, progress)
    }

    /// Toggles training mode. Returns whether it is now on.
    pub fn toggle_training(&mut self) -> bool {
        self.trainer.toggle()
    }

    pub fn cancel_training(&mut self) {
        self.trainer.cancel();
    }

    /// Region and example boxes are drawn in view space like capture
    /// rectangles and stored in content space.
    pub fn draw_training_region(&mut self, start: Point, end: Point) -> Result<()> {
        let t = self.transform;
        self.trainer
            .draw_region(t.to_content_point(start), t.to_content_point(end))
    }

    pub fn draw_training_example(&mut self, start: Point, end: Point) -> Result<SampleProgress> {
        let t = self.transform;
        self.trainer
            .draw_example(t.to_content_point(start), t.to_content_point(end))
    }

    /// Computes a profile from the collected examples and adopts it.
    ///
    /// On `NoGapSamples` the previous profile stays in place. Either way the
    /// trainer ends up idle. A failing glyph source leaves the trainer ready
    /// so the computation can be retried.
    pub fn finish_training<S, P>(
        &mut self,
        source: &S,
        progress: &mut P,
    ) -> Result<ToleranceProfile>
    where
        S: GlyphSource + ?Sized,
        P: ProgressSink + ?Sized,
    {
        if !self.trainer.is_ready() {
            return Err(self.trainer.invalid("compute tolerances"));
        }

        progress.report(StatusUpdate::working("Computing tolerances from training..."));
        let glyphs = match source.page_glyphs() {
            Ok(glyphs) => glyphs,
            Err(e) => {
                progress.report(StatusUpdate::failure(
                    "An error occurred while reading training text.",
                ));
                return Err(e);
            }
        };
        let fragments: Vec<GlyphFragment> =
            glyphs.iter().filter_map(GlyphFragment::from_raw).collect();

        match self.trainer.compute(&fragments) {
            Ok(profile) => {
                self.profile = profile;
                info!(%profile, "tolerances updated");
                progress.report(StatusUpdate::success(format!("Updated tolerances: {profile}")));
                Ok(profile)
            }
            Err(e) => {
                progress.report(StatusUpdate::failure("No valid text found in training boxes."));
                Err(e)
            }
        }
    }
}
