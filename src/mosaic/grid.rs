//! Per-region tile matching and element placement
//!
//! A region is processed tile by tile in row-major order: the tile's source
//! pixels are averaged, the closest element is resolved, and the element's
//! block is copied into a buffer that covers only the region. Nothing
//! outside the region is touched, so any number of regions can be processed
//! at once as long as they do not overlap.

use image::imageops;
use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::color::metric::mean_color;
use crate::color::resolver::TileResolver;
use crate::io::error::{Result, worker_task_error};
use crate::mosaic::region::Region;

/// Rendered pixels of one region plus where they belong
#[derive(Debug, Clone)]
pub struct RegionOutput {
    /// Absolute placement on the canvas
    pub region: Region,
    /// Region pixels, `region.width` x `region.height`
    pub pixels: RgbImage,
    /// Catalog index chosen for each tile (rows, cols)
    pub assignments: Array2<usize>,
}

/// Truncated mean color of the `tile_size` square at (`x`, `y`)
///
/// Returns `None` if the square is not fully inside `source`.
pub fn tile_mean(source: &RgbImage, x: u32, y: u32, tile_size: u32) -> Option<Rgb<u8>> {
    let right = x.checked_add(tile_size)?;
    let bottom = y.checked_add(tile_size)?;
    if right > source.width() || bottom > source.height() {
        return None;
    }

    mean_color((y..bottom).flat_map(|py| (x..right).map(move |px| source.get_pixel(px, py))))
}

/// Match and place every tile of `region`
///
/// # Errors
///
/// Returns `WorkerTask` if the region is not tile aligned, extends past the
/// source image, the catalog blocks are a different size than `tile_size`,
/// or a tile cannot be resolved.
pub fn process_region(
    source: &RgbImage,
    region: Region,
    resolver: &TileResolver<'_>,
    tile_size: u32,
) -> Result<RegionOutput> {
    if !region.is_tile_aligned(tile_size) {
        return Err(worker_task_error(
            region,
            &format!("region is not aligned to {tile_size} pixel tiles"),
        ));
    }
    if !region.fits_within(source.width(), source.height()) {
        return Err(worker_task_error(
            region,
            &format!(
                "region exceeds source image of {}x{}",
                source.width(),
                source.height()
            ),
        ));
    }
    let block_size = resolver.catalog().tile_size();
    if block_size != tile_size {
        return Err(worker_task_error(
            region,
            &format!("catalog blocks are {block_size} pixels, tiles are {tile_size}"),
        ));
    }

    let (rows, cols) = region.tile_dimensions(tile_size);
    let mut pixels = RgbImage::new(region.width, region.height);
    let mut assignments = Array2::zeros((rows, cols));

    // Assignments iterate in row-major order, matching the tile origins
    for (slot, (x, y)) in assignments.iter_mut().zip(region.tile_origins(tile_size)) {
        let local_x = x - region.x;
        let local_y = y - region.y;

        let color = tile_mean(source, x, y, tile_size).ok_or_else(|| {
            worker_task_error(
                region,
                &format!("tile ({local_x}, {local_y}) has no source pixels"),
            )
        })?;
        let resolved = resolver.resolve(color).ok_or_else(|| {
            worker_task_error(region, &format!("no element matches color {:?}", color.0))
        })?;

        imageops::replace(
            &mut pixels,
            resolved.pixel_block(),
            i64::from(local_x),
            i64::from(local_y),
        );
        *slot = resolved.index;
    }

    Ok(RegionOutput {
        region,
        pixels,
        assignments,
    })
}
