//! Fragment-to-line grouping.
//!
//! Contains group_lines() for partitioning fragments into rows using the
//! fixed `LINE_BAND`. The tolerance profile plays no part here.

use super::super::params::{LINE_BAND, LineAnchor};
use super::super::types::{GlyphFragment, TextLine};

/// Groups fragments into horizontal lines.
///
/// # Algorithm
/// - Sort fragments by ascending y (stable, so ties keep input order)
/// - Put each fragment into the first existing line whose reference y is
///   within `LINE_BAND`, otherwise open a new line
///
/// With `LineAnchor::FirstMember` the reference y is the y of the line's
/// first fragment and never moves. Lines come out in creation order, which is
/// ascending reference y; members are not sorted horizontally.
pub fn group_lines<I>(fragments: I, anchor: LineAnchor) -> Vec<TextLine>
where
    I: IntoIterator<Item = GlyphFragment>,
{
    let mut sorted: Vec<GlyphFragment> = fragments.into_iter().collect();
    sorted.sort_by(|a, b| a.y().partial_cmp(&b.y()).unwrap_or(std::cmp::Ordering::Equal));

    let mut lines: Vec<TextLine> = Vec::new();
    for frag in sorted {
        let y = frag.y();
        match lines
            .iter_mut()
            .find(|line| (y - line.reference_y()).abs() <= LINE_BAND)
        {
            Some(line) => {
                line.push(frag);
                if anchor == LineAnchor::RunningMean {
                    let mean = line.mean_y();
                    line.set_reference_y(mean);
                }
            }
            None => lines.push(TextLine::new(frag)),
        }
    }
    lines
}
