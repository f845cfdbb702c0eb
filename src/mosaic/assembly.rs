//! Single-threaded canvas assembly from region outputs
//!
//! Region outputs may arrive in any order. Each output carries its own
//! placement, and a per-tile bit mask proves that every tile of the canvas
//! is written exactly once before the canvas is released.

use bitvec::prelude::*;
use image::RgbImage;
use image::imageops;
use ndarray::{Array2, s};

use crate::io::error::{MosaicError, Result};
use crate::mosaic::grid::RegionOutput;

/// A finished mosaic held in memory
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Full output canvas
    pub canvas: RgbImage,
    /// Catalog index chosen for every tile of the canvas (rows, cols)
    pub assignments: Array2<usize>,
}

/// Place every output on a fresh canvas and verify exact coverage
///
/// # Errors
///
/// Returns `Assembly` on overlapping, misplaced or missing regions.
pub fn assemble(canvas_size: u32, tile_size: u32, outputs: &[RegionOutput]) -> Result<Mosaic> {
    let mut assembler = CanvasAssembler::new(canvas_size, tile_size);
    for output in outputs {
        assembler.place(output)?;
    }
    assembler.finish()
}

/// Copies region outputs into the canvas while tracking tile coverage
#[derive(Debug)]
pub struct CanvasAssembler {
    canvas: RgbImage,
    assignments: Array2<usize>,
    placed: BitVec,
    tile_size: u32,
    tiles_per_side: usize,
}

impl CanvasAssembler {
    /// Create a blank `canvas_size` square canvas split into `tile_size` tiles
    pub fn new(canvas_size: u32, tile_size: u32) -> Self {
        let tiles_per_side = canvas_size.checked_div(tile_size).unwrap_or(0) as usize;
        Self {
            canvas: RgbImage::new(canvas_size, canvas_size),
            assignments: Array2::zeros((tiles_per_side, tiles_per_side)),
            placed: bitvec![0; tiles_per_side * tiles_per_side],
            tile_size,
            tiles_per_side,
        }
    }

    /// Number of tiles written so far
    pub fn placed_tiles(&self) -> usize {
        self.placed.count_ones()
    }

    /// Total number of tiles on the canvas
    pub fn total_tiles(&self) -> usize {
        self.placed.len()
    }

    /// Copy one region output to its absolute position
    ///
    /// # Errors
    ///
    /// Returns `Assembly` if the output is misaligned, falls outside the
    /// canvas, has inconsistent dimensions, or overlaps a tile that was
    /// already placed. The canvas is left unchanged on error.
    pub fn place(&mut self, output: &RegionOutput) -> Result<()> {
        let region = output.region;
        if !region.is_tile_aligned(self.tile_size)
            || !region.fits_within(self.canvas.width(), self.canvas.height())
        {
            return Err(MosaicError::Assembly {
                reason: format!("region {region} does not fit the tile grid"),
            });
        }
        if output.pixels.dimensions() != (region.width, region.height) {
            return Err(MosaicError::Assembly {
                reason: format!(
                    "region {region} delivered a {}x{} pixel buffer",
                    output.pixels.width(),
                    output.pixels.height()
                ),
            });
        }

        let (rows, cols) = region.tile_dimensions(self.tile_size);
        if output.assignments.dim() != (rows, cols) {
            return Err(MosaicError::Assembly {
                reason: format!("region {region} delivered a mismatched assignment map"),
            });
        }

        let first_row = (region.y / self.tile_size) as usize;
        let first_col = (region.x / self.tile_size) as usize;
        let tile_ids: Vec<usize> = (first_row..first_row + rows)
            .flat_map(|row| (first_col..first_col + cols).map(move |col| (row, col)))
            .map(|(row, col)| row * self.tiles_per_side + col)
            .collect();

        if let Some(&overlap) = tile_ids
            .iter()
            .find(|&&id| self.placed.get(id).as_deref() == Some(&true))
        {
            return Err(MosaicError::Assembly {
                reason: format!(
                    "region {region} overlaps tile ({}, {}) that was already written",
                    overlap % self.tiles_per_side,
                    overlap / self.tiles_per_side
                ),
            });
        }

        for id in tile_ids {
            self.placed.set(id, true);
        }
        imageops::replace(
            &mut self.canvas,
            &output.pixels,
            i64::from(region.x),
            i64::from(region.y),
        );
        self.assignments
            .slice_mut(s![first_row..first_row + rows, first_col..first_col + cols])
            .assign(&output.assignments);

        Ok(())
    }

    /// Release the canvas once every tile has been written
    ///
    /// # Errors
    ///
    /// Returns `Assembly` naming the first unwritten tile if coverage is
    /// incomplete.
    pub fn finish(self) -> Result<Mosaic> {
        if let Some(gap) = self.placed.first_zero() {
            return Err(MosaicError::Assembly {
                reason: format!(
                    "{} of {} tiles were never written, first at tile ({}, {})",
                    self.placed.count_zeros(),
                    self.placed.len(),
                    gap % self.tiles_per_side.max(1),
                    gap / self.tiles_per_side.max(1)
                ),
            });
        }

        Ok(Mosaic {
            canvas: self.canvas,
            assignments: self.assignments,
        })
    }
}
