//! Layout Analysis Module - grouping and clustering algorithms
//!
//! Contains the two stages of a clustering pass:
//! - Grouping glyph fragments into text lines
//! - Merging lines and fragments into label clusters

mod clustering;
mod grouping;

// Re-export public functions
pub use clustering::{build_clusters, cluster_fragments};
pub use grouping::group_lines;
