//! Color matching

/// Exact nearest-color index
pub mod index;
/// RGB distance and mean color helpers
pub mod metric;
/// Average color to element lookup
pub mod resolver;

pub use index::ColorIndex;
pub use resolver::TileResolver;
