//! Mosaic generation
//!
//! This module contains:
//! - Canvas partitioning into task regions
//! - Per-region tile matching
//! - Canvas assembly and run orchestration

/// Order-independent canvas assembly
pub mod assembly;
/// Per-region tile processing
pub mod grid;
/// End-to-end run orchestration
pub mod orchestrator;
/// Task regions and partitioning
pub mod region;
/// Run lifecycle state machine
pub mod state;

pub use assembly::Mosaic;
pub use orchestrator::MosaicGenerator;
pub use region::Region;
