//! Tile-aligned canvas regions and canvas partitioning

use std::fmt;

use crate::io::configuration::MosaicConfig;

/// Axis-aligned rectangle of canvas pixels
///
/// Used as the descriptor of one worker task. The origin is the top-left
/// pixel and the extent is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Create a region from origin and extent
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the region fits inside a `width` x `height` image
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Whether origin and extent are all multiples of `tile_size`
    pub const fn is_tile_aligned(&self, tile_size: u32) -> bool {
        tile_size > 0
            && self.x % tile_size == 0
            && self.y % tile_size == 0
            && self.width % tile_size == 0
            && self.height % tile_size == 0
    }

    /// Tile rows and columns inside the region
    pub const fn tile_dimensions(&self, tile_size: u32) -> (usize, usize) {
        if tile_size == 0 {
            return (0, 0);
        }
        (
            (self.height / tile_size) as usize,
            (self.width / tile_size) as usize,
        )
    }

    /// Top-left canvas coordinates of every tile, in row-major order
    pub fn tile_origins(&self, tile_size: u32) -> Vec<(u32, u32)> {
        if tile_size == 0 {
            return Vec::new();
        }
        let step = tile_size as usize;
        (self.y..self.bottom())
            .step_by(step)
            .flat_map(|y| (self.x..self.right()).step_by(step).map(move |x| (x, y)))
            .collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Split a `canvas_size` square into `task_size` squares clipped at the edge
///
/// Regions are listed in row-major order. Returns an empty list if either
/// size is zero.
pub fn partition_square(canvas_size: u32, task_size: u32) -> Vec<Region> {
    if canvas_size == 0 || task_size == 0 {
        return Vec::new();
    }

    let step = task_size as usize;
    (0..canvas_size)
        .step_by(step)
        .flat_map(|y| {
            (0..canvas_size).step_by(step).map(move |x| {
                let width = task_size.min(canvas_size - x);
                let height = task_size.min(canvas_size - y);
                Region::new(x, y, width, height)
            })
        })
        .collect()
}

/// Task regions for a validated configuration and its dispatch mode
pub fn partition(config: &MosaicConfig) -> Vec<Region> {
    partition_square(config.output_size, config.task_size())
}
