//! Element catalog construction from a directory of images

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::catalog::element::{Catalog, Element};
use crate::io::configuration::{DecodePolicy, MosaicConfig};
use crate::io::error::{MosaicError, Result};
use crate::io::image::load_element_block;

/// Catalog together with what was left out while scanning
#[derive(Debug)]
pub struct BuildOutcome {
    /// Decoded, sorted catalog
    pub catalog: Catalog,
    /// Files that were skipped under [`DecodePolicy::Skip`]
    pub skipped: Vec<PathBuf>,
}

/// Scans an elements directory into a [`Catalog`]
pub struct CatalogBuilder<'a> {
    config: &'a MosaicConfig,
}

impl<'a> CatalogBuilder<'a> {
    /// Create a builder using the tile size, filter and policy of `config`
    pub const fn new(config: &'a MosaicConfig) -> Self {
        Self { config }
    }

    /// Decode every regular file in `directory` into a catalog element
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `FileSystem` if the directory cannot be read
    /// - `ElementDecode` for the first undecodable file in path order under
    ///   [`DecodePolicy::Abort`]; files after it are not decoded
    /// - `CatalogEmpty` if no element could be decoded
    pub fn build(&self, directory: &Path) -> Result<BuildOutcome> {
        let files = list_element_files(directory)?;
        debug!(
            directory = %directory.display(),
            files = files.len(),
            "scanning element directory"
        );

        let tile_size = self.config.tile_size;
        let filter = self.config.element_filter;
        let abort = self.config.decode_policy == DecodePolicy::Abort;
        // Lowest file index that failed to decode; later files are not attempted
        let first_failure = AtomicUsize::new(usize::MAX);

        let decoded: Vec<(PathBuf, Option<Result<Element>>)> = files
            .into_par_iter()
            .enumerate()
            .map(|(position, path)| {
                if abort && position > first_failure.load(Ordering::Relaxed) {
                    return (path, None);
                }
                let element = load_element_block(&path, tile_size, filter)
                    .and_then(|block| Element::from_block(path.clone(), block));
                if abort && element.is_err() {
                    first_failure.fetch_min(position, Ordering::Relaxed);
                }
                (path, Some(element))
            })
            .collect();

        let mut elements = Vec::with_capacity(decoded.len());
        let mut skipped = Vec::new();
        for (path, element) in decoded {
            match element {
                Some(Ok(element)) => elements.push(element),
                Some(Err(err)) if abort => return Err(err),
                Some(Err(err)) => {
                    warn!(path = %path.display(), "skipping element: {err}");
                    skipped.push(path);
                }
                // Only reachable after an earlier failure under the abort policy
                None => {}
            }
        }

        let catalog = Catalog::new(elements, tile_size, directory, skipped.len())?;
        info!(
            elements = catalog.len(),
            skipped = skipped.len(),
            "element catalog built"
        );

        Ok(BuildOutcome { catalog, skipped })
    }
}

/// Regular files directly inside `directory`, sorted by path
///
/// # Errors
///
/// Returns `FileSystem` if the directory or one of its entries cannot be read.
pub fn list_element_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |e| MosaicError::FileSystem {
        path: directory.to_path_buf(),
        operation: "read elements directory",
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
