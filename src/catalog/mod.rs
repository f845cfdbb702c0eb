//! Element catalog
//!
//! This module contains:
//! - Element and catalog data types
//! - Directory scanning and element decoding

/// Catalog construction from an elements directory
pub mod builder;
/// Element and catalog data types
pub mod element;

pub use builder::CatalogBuilder;
pub use element::{Catalog, Element};
