//! Layout value types: fragments, lines, clusters and markers.

mod cluster;
mod fragment;
mod textline;

pub use cluster::{Cluster, Marker};
pub use fragment::{GlyphFragment, RawGlyph};
pub use textline::TextLine;
