//! Mosaic constants and the immutable run configuration built from them

use image::imageops::FilterType;

use crate::io::error::{MosaicError, Result, invalid_parameter};

/// Edge length of the square output canvas in pixels
pub const OUTPUT_SIZE: u32 = 4096;

/// Edge length of one mosaic tile in pixels
pub const TILE_SIZE: u32 = 16;

/// Edge length of one chunk task in pixels (chunked dispatch only)
pub const CHUNK_SIZE: u32 = 256;

/// Resampling filter used to scale the target image to the canvas
pub const DEFAULT_SOURCE_FILTER: FilterType = FilterType::Lanczos3;

/// Resampling filter used to scale element images to tile size
pub const DEFAULT_ELEMENT_FILTER: FilterType = FilterType::CatmullRom;

/// Prefix of the temporary file the canvas is encoded into before promotion
pub const TEMP_FILE_PREFIX: &str = ".tilemosaic-";

/// Name prefix for worker pool threads
pub const WORKER_THREAD_PREFIX: &str = "mosaic-worker";

// Progress bar display settings
/// Width of the progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// What to do when an element file cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Log a warning and leave the file out of the catalog
    #[default]
    Skip,
    /// Fail the whole run
    Abort,
}

/// Granularity of the tasks handed to the worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One task per `chunk_size` square, clipped at the canvas edge
    #[default]
    Chunked,
    /// One task per tile
    PerTile,
}

/// Immutable settings for a single mosaic run
///
/// Built once at startup and passed by reference to every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Edge length of the square output canvas
    pub output_size: u32,
    /// Edge length of one tile
    pub tile_size: u32,
    /// Edge length of one chunk task
    pub chunk_size: u32,
    /// Task granularity
    pub dispatch: Dispatch,
    /// Handling of undecodable element files
    pub decode_policy: DecodePolicy,
    /// Worker pool size, `None` for one thread per core
    pub worker_threads: Option<usize>,
    /// Filter used when scaling the target image
    pub source_filter: FilterType,
    /// Filter used when scaling element images
    pub element_filter: FilterType,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            output_size: OUTPUT_SIZE,
            tile_size: TILE_SIZE,
            chunk_size: CHUNK_SIZE,
            dispatch: Dispatch::default(),
            decode_policy: DecodePolicy::default(),
            worker_threads: None,
            source_filter: DEFAULT_SOURCE_FILTER,
            element_filter: DEFAULT_ELEMENT_FILTER,
        }
    }
}

impl MosaicConfig {
    /// Check the geometric invariants the grid relies on
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the output size is not a multiple of
    /// the tile size, and `InvalidParameter` for zero sizes, a chunk size that
    /// does not hold a whole number of tiles, or a zero thread count.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be positive",
            ));
        }
        if self.output_size == 0 {
            return Err(invalid_parameter(
                "output_size",
                &self.output_size,
                &"must be positive",
            ));
        }
        if self.output_size % self.tile_size != 0 {
            return Err(MosaicError::DimensionMismatch {
                output_size: self.output_size,
                tile_size: self.tile_size,
            });
        }
        if self.chunk_size == 0 || self.chunk_size % self.tile_size != 0 {
            return Err(invalid_parameter(
                "chunk_size",
                &self.chunk_size,
                &format!("must be a positive multiple of tile size {}", self.tile_size),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(invalid_parameter(
                "worker_threads",
                &0,
                &"at least one worker is required",
            ));
        }
        Ok(())
    }

    /// Number of tiles along one edge of the canvas
    pub const fn tiles_per_side(&self) -> u32 {
        self.output_size / self.tile_size
    }

    /// Total number of tiles on the canvas
    pub const fn tile_count(&self) -> usize {
        let side = self.tiles_per_side() as usize;
        side * side
    }

    /// Edge length of the square task regions for the configured dispatch
    pub const fn task_size(&self) -> u32 {
        match self.dispatch {
            Dispatch::Chunked => self.chunk_size,
            Dispatch::PerTile => self.tile_size,
        }
    }
}
