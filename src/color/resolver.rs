//! Average color to element lookup

use image::{Rgb, RgbImage};

use crate::catalog::element::{Catalog, Element};
use crate::color::index::ColorIndex;

/// Element chosen for one tile
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Catalog index of the element
    pub index: usize,
    /// The element itself
    pub element: &'a Element,
}

impl<'a> Resolved<'a> {
    /// Pixels to copy into the tile
    pub fn pixel_block(&self) -> &'a RgbImage {
        &self.element.pixel_block
    }
}

/// Read-only pairing of a catalog with its color index
///
/// Holds no mutable state, so one resolver is shared by every worker.
#[derive(Debug, Clone, Copy)]
pub struct TileResolver<'a> {
    catalog: &'a Catalog,
    index: &'a ColorIndex,
}

impl<'a> TileResolver<'a> {
    /// Pair a catalog with an index built from the same catalog
    pub const fn new(catalog: &'a Catalog, index: &'a ColorIndex) -> Self {
        Self { catalog, index }
    }

    /// Element whose representative color is closest to `color`
    pub fn resolve(&self, color: Rgb<u8>) -> Option<Resolved<'a>> {
        let index = self.index.nearest(color)?;
        let element = self.catalog.get(index)?;
        Some(Resolved { index, element })
    }

    /// Catalog behind the resolver
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }
}
