//! Image decoding, resampling and atomic PNG/JPEG export

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::io::configuration::TEMP_FILE_PREFIX;
use crate::io::error::{MosaicError, Result, output_io_error};

/// Decode the target image
///
/// # Errors
///
/// Returns `InputDecode` if the file cannot be opened or decoded.
pub fn load_source(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| MosaicError::InputDecode {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Convert to RGB and resample to an exact `size` x `size` square
pub fn prepare_source(image: &DynamicImage, size: u32, filter: FilterType) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (size, size) {
        return rgb;
    }
    imageops::resize(&rgb, size, size, filter)
}

/// Decode an element file and resample it to a `tile_size` square block
///
/// # Errors
///
/// Returns `ElementDecode` if the file cannot be opened or decoded.
pub fn load_element_block(path: &Path, tile_size: u32, filter: FilterType) -> Result<RgbImage> {
    let decoded = image::open(path).map_err(|e| MosaicError::ElementDecode {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(prepare_source(&decoded, tile_size, filter))
}

/// Encode `canvas` next to `output_path` and rename it into place
///
/// The format is chosen from the output extension. Nothing is left at
/// `output_path` unless the encode and the rename both succeed.
///
/// # Errors
///
/// Returns `OutputWrite` if the extension is not a known image format, the
/// parent directory cannot be created, or encoding/renaming fails.
pub fn write_atomically(canvas: &RgbImage, output_path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(output_path).map_err(|e| MosaicError::OutputWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    let directory = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&directory).map_err(|e| MosaicError::FileSystem {
        path: directory.clone(),
        operation: "create directory",
        source: e,
    })?;

    let suffix = output_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut staging = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(&suffix)
        .tempfile_in(&directory)
        .map_err(|e| output_io_error(output_path, e))?;

    {
        let mut writer = BufWriter::new(staging.as_file_mut());
        canvas
            .write_to(&mut writer, format)
            .map_err(|e| MosaicError::OutputWrite {
                path: output_path.to_path_buf(),
                source: e,
            })?;
        writer
            .flush()
            .map_err(|e| output_io_error(output_path, e))?;
    }

    // A failed persist drops the temporary file, removing it from disk
    staging
        .persist(output_path)
        .map_err(|e| output_io_error(output_path, e.error))?;

    Ok(())
}
