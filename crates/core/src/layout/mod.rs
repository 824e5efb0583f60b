//! Layout module for glyph clustering.
//!
//! This module contains:
//! - Layout value types (GlyphFragment, TextLine, Cluster, Marker)
//! - Clustering parameters (ToleranceProfile, LineAnchor)
//! - Grouping and clustering algorithms

pub mod analysis;
pub mod params;
pub mod types;

// Re-export params
pub use params::*;

// Re-export value types
pub use types::*;

// Re-export analysis functions
pub use analysis::*;
