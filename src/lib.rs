//! Photomosaic generation from a folder of element images
//!
//! A target image is resized to a square canvas and split into fixed-size
//! tiles. Each tile is replaced by the element image whose mean color is
//! nearest to the tile's mean color, with regions of the canvas processed
//! in parallel and assembled into a single output image.

#![deny(unsafe_code)]

/// Element catalog construction from a directory of images
pub mod catalog;
/// Color distance, nearest-color indexing and tile resolution
pub mod color;
/// Input/output operations, configuration and error handling
pub mod io;
/// Canvas partitioning, region processing and run orchestration
pub mod mosaic;

pub use io::error::{MosaicError, Result};
pub use mosaic::orchestrator::{RunReport, create_mosaic};
