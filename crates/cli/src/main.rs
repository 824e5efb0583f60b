//! labelscrape - place location markers from page text
//!
//! Reads a JSON dump of a page's text items, clusters the text under a
//! capture rectangle and appends the resulting markers to a JSON marker
//! file. Tolerance profiles are trained from example boxes and persisted in
//! a session file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use labelscrape_core::layout::{GlyphFragment, LineAnchor, ScrapeOptions};
use labelscrape_core::progress::TracingProgress;
use labelscrape_core::training::SAMPLE_COUNT;
use labelscrape_core::utils::HasBBox;
use labelscrape_core::{
    AutomapOutcome, BBox, MarkerStore, MatchMode, Point, RawGlyph, ScrapeOutcome, ScrapeSession,
    ToleranceProfile, ViewTransform, group_lines,
};

const DEFAULT_SESSION: &str = "labelscrape-session.json";

/// Place location markers from the text of a page.
#[derive(Parser, Debug)]
#[command(name = "labelscrape")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue, global = true)]
    debug: bool,

    /// Session file holding the tolerance profile
    #[arg(long, default_value = DEFAULT_SESSION, global = true)]
    session: PathBuf,

    /// Regroup rows around the running mean of their members
    #[arg(long = "running-mean", action = ArgAction::SetTrue, global = true)]
    running_mean: bool,

    /// Number of text items scanned per progress step
    #[arg(
        long = "batch-size",
        default_value_t = ScrapeOptions::default().batch_size,
        global = true
    )]
    batch_size: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the text under a capture rectangle into markers
    Scrape {
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        view: ViewArgs,
        /// Capture rectangle in view space: x1,y1,x2,y2
        #[arg(long, value_parser = parse_rect)]
        rect: Rect,
    },
    /// Derive a tolerance profile from one region and five example boxes
    Train {
        /// Page text items as JSON
        #[arg(long)]
        page: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Region box in view space: x1,y1,x2,y2
        #[arg(long, value_parser = parse_rect)]
        region: Rect,
        /// Example box in view space; give exactly five
        #[arg(long = "example", value_parser = parse_rect, num_args = 1)]
        examples: Vec<Rect>,
    },
    /// Place markers on every cluster matching a search term
    Automap {
        #[command(flatten)]
        page: PageArgs,
        /// Text to search for
        term: String,
        /// Only accept clusters containing the whole phrase, labelled with it
        #[arg(long, action = ArgAction::SetTrue)]
        exact: bool,
    },
    /// Show or override the stored tolerance profile
    Tolerance {
        #[command(subcommand)]
        action: ToleranceAction,
    },
    /// Print the text rows found on a page
    Lines {
        /// Page text items as JSON
        page: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ToleranceAction {
    Show,
    Set {
        #[arg(long)]
        horizontal: f64,
        #[arg(long)]
        vertical: f64,
    },
}

#[derive(ClapArgs, Debug)]
struct PageArgs {
    /// Page text items as JSON
    #[arg(long)]
    page: PathBuf,
    /// Marker file to read and extend; created when missing
    #[arg(long)]
    markers: PathBuf,
    /// Dot size used when the marker file does not exist yet
    #[arg(long = "dot-size", default_value_t = 1.0)]
    dot_size: f64,
}

#[derive(ClapArgs, Debug)]
struct ViewArgs {
    /// View translation: x,y
    #[arg(long, value_parser = parse_point, default_value = "0,0")]
    translate: Point,
    /// View zoom factor
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

impl ViewArgs {
    fn transform(&self) -> Result<ViewTransform> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            bail!("scale must be a positive number, got {}", self.scale);
        }
        Ok(ViewTransform::new(self.translate.0, self.translate.1, self.scale))
    }
}

/// A drag from one corner to the other.
#[derive(Debug, Clone, Copy)]
struct Rect {
    start: Point,
    end: Point,
}

impl Rect {
    fn bbox(&self) -> BBox {
        BBox::from_corners(self.start, self.end)
    }
}

fn parse_numbers(s: &str, expected: usize) -> std::result::Result<Vec<f64>, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(format!("expected {} comma separated numbers, got {}", expected, values.len()));
    }
    Ok(values)
}

fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let v = parse_numbers(s, 4)?;
    Ok(Rect {
        start: (v[0], v[1]),
        end: (v[2], v[3]),
    })
}

fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let v = parse_numbers(s, 2)?;
    Ok((v[0], v[1]))
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "labelscrape=debug,labelscrape_core=debug"
    } else {
        "labelscrape=info,labelscrape_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_glyphs(path: &Path) -> Result<Vec<RawGlyph>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read page text {}", path.display()))?;
    let glyphs: Vec<RawGlyph> = serde_json::from_str(&data)
        .with_context(|| format!("invalid page text in {}", path.display()))?;
    debug!(path = %path.display(), items = glyphs.len(), "loaded page text");
    Ok(glyphs)
}

fn read_markers(path: &Path, dot_size: f64) -> Result<MarkerStore> {
    if !path.exists() {
        return Ok(MarkerStore::new(dot_size));
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read markers {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid marker file {}", path.display()))
}

fn write_markers(path: &Path, store: &MarkerStore) -> Result<()> {
    let data = serde_json::to_string_pretty(store)?;
    fs::write(path, data).with_context(|| format!("failed to write markers {}", path.display()))
}

fn open_session(args: &Args) -> Result<ScrapeSession> {
    let session = if args.session.exists() {
        ScrapeSession::load(&args.session)
            .with_context(|| format!("failed to load session {}", args.session.display()))?
    } else {
        ScrapeSession::default()
    };
    let options = ScrapeOptions {
        line_anchor: if args.running_mean {
            LineAnchor::RunningMean
        } else {
            LineAnchor::FirstMember
        },
        batch_size: args.batch_size.max(1),
    };
    Ok(session.with_options(options))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut session = open_session(args)?;

    match &args.command {
        Command::Scrape { page, view, rect } => {
            session.set_transform(view.transform()?);
            let glyphs = read_glyphs(&page.page)?;
            let mut store = read_markers(&page.markers, page.dot_size)?;
            let outcome = session.scrape(rect.bbox(), &glyphs, &mut store, &mut TracingProgress)?;
            if outcome.placed() > 0 {
                write_markers(&page.markers, &store)?;
            }
            if let ScrapeOutcome::Placed { markers, .. } = &outcome {
                print_json(markers)?;
            }
        }
        Command::Train {
            page,
            view,
            region,
            examples,
        } => {
            if examples.len() != SAMPLE_COUNT {
                bail!(
                    "training needs exactly {} example boxes, got {}",
                    SAMPLE_COUNT,
                    examples.len()
                );
            }
            session.set_transform(view.transform()?);
            let glyphs = read_glyphs(page)?;
            session.toggle_training();
            session.draw_training_region(region.start, region.end)?;
            for example in examples {
                let progress = session.draw_training_example(example.start, example.end)?;
                if let Some(label) = session.trainer().progress_label() {
                    debug!(count = progress.count, label = %label, "example recorded");
                }
            }
            let profile = session.finish_training(&glyphs, &mut TracingProgress)?;
            session
                .save(&args.session)
                .with_context(|| format!("failed to save session {}", args.session.display()))?;
            println!("{profile}");
        }
        Command::Automap { page, term, exact } => {
            let glyphs = read_glyphs(&page.page)?;
            let mut store = read_markers(&page.markers, page.dot_size)?;
            let mode = if *exact {
                MatchMode::ExactPhrase
            } else {
                MatchMode::Contains
            };
            let outcome = session.automap(term, mode, &glyphs, &mut store, &mut TracingProgress)?;
            if outcome.placed() > 0 {
                write_markers(&page.markers, &store)?;
            }
            if let AutomapOutcome::Completed { markers, .. } = &outcome {
                print_json(markers)?;
            }
        }
        Command::Tolerance { action } => match action {
            ToleranceAction::Show => println!("{}", session.profile()),
            ToleranceAction::Set {
                horizontal,
                vertical,
            } => {
                let profile = ToleranceProfile::new(*horizontal, *vertical)?;
                session.set_profile(profile);
                session
                    .save(&args.session)
                    .with_context(|| format!("failed to save session {}", args.session.display()))?;
                info!(%profile, "tolerances saved");
                println!("{profile}");
            }
        },
        Command::Lines { page } => {
            let fragments: Vec<GlyphFragment> = read_glyphs(page)?
                .iter()
                .filter_map(GlyphFragment::from_raw)
                .collect();
            let anchor = session.context().options.line_anchor;
            let mut out = io::stdout().lock();
            for line in group_lines(fragments, anchor) {
                let texts: Vec<&str> = line
                    .sorted_by_x()
                    .into_iter()
                    .map(GlyphFragment::text)
                    .collect();
                writeln!(
                    out,
                    "{:>8.1} {:>8.1}  {}",
                    line.reference_y(),
                    line.x0(),
                    texts.join(" ")
                )?;
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
