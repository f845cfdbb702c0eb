//! Element and catalog data types

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::color::metric::mean_color;
use crate::io::error::{MosaicError, Result, invalid_parameter};

/// A candidate tile image with its precomputed representative color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Source file of the element
    pub path: PathBuf,
    /// Truncated per-channel mean of `pixel_block`
    pub representative_color: Rgb<u8>,
    /// Element pixels already resized to tile dimensions
    pub pixel_block: RgbImage,
}

impl Element {
    /// Create an element from a pixel block that is already tile sized
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the block is empty.
    pub fn from_block(path: impl Into<PathBuf>, pixel_block: RgbImage) -> Result<Self> {
        let path = path.into();
        let representative_color = mean_color(pixel_block.pixels()).ok_or_else(|| {
            invalid_parameter(
                "pixel_block",
                &path.display(),
                &"element block has no pixels",
            )
        })?;

        Ok(Self {
            path,
            representative_color,
            pixel_block,
        })
    }
}

/// Non-empty, ordered collection of elements
///
/// Elements are kept sorted by representative color and then by path, so
/// the catalog index of every element is reproducible across runs.
#[derive(Debug, Clone)]
pub struct Catalog {
    elements: Vec<Element>,
    tile_size: u32,
}

impl Catalog {
    /// Build a catalog from elements scanned in `directory`
    ///
    /// # Errors
    ///
    /// Returns `CatalogEmpty` if `elements` is empty and `InvalidParameter`
    /// if any element block is not `tile_size` square.
    pub fn new(
        mut elements: Vec<Element>,
        tile_size: u32,
        directory: &Path,
        skipped: usize,
    ) -> Result<Self> {
        if elements.is_empty() {
            return Err(MosaicError::CatalogEmpty {
                directory: directory.to_path_buf(),
                skipped,
            });
        }

        if let Some(element) = elements
            .iter()
            .find(|e| e.pixel_block.dimensions() != (tile_size, tile_size))
        {
            let (width, height) = element.pixel_block.dimensions();
            return Err(invalid_parameter(
                "pixel_block",
                &format!("{width}x{height}"),
                &format!(
                    "element '{}' must be {tile_size}x{tile_size}",
                    element.path.display()
                ),
            ));
        }

        elements.sort_by(|a, b| {
            a.representative_color
                .0
                .cmp(&b.representative_color.0)
                .then_with(|| a.path.cmp(&b.path))
        });

        Ok(Self {
            elements,
            tile_size,
        })
    }

    /// All elements in catalog order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Element at a catalog index
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Number of elements
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the catalog holds no elements
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Edge length of every element block
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Representative colors in catalog order
    pub fn colors(&self) -> Vec<Rgb<u8>> {
        self.elements
            .iter()
            .map(|element| element.representative_color)
            .collect()
    }
}
