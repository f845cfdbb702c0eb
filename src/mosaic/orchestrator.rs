//! End-to-end mosaic generation
//!
//! Drives one run through its lifecycle: catalog and index construction,
//! canvas preparation, parallel region processing on a dedicated worker
//! pool, order-independent assembly, and an atomic write of the result.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::DynamicImage;
use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::builder::{BuildOutcome, CatalogBuilder};
use crate::catalog::element::Catalog;
use crate::color::index::ColorIndex;
use crate::color::resolver::TileResolver;
use crate::io::configuration::{MosaicConfig, WORKER_THREAD_PREFIX};
use crate::io::error::{MosaicError, Result};
use crate::io::image::{load_source, prepare_source, write_atomically};
use crate::io::progress::MosaicProgress;
use crate::mosaic::assembly::{Mosaic, assemble};
use crate::mosaic::grid::{RegionOutput, process_region};
use crate::mosaic::region::{Region, partition};
use crate::mosaic::state::{RunState, RunTracker};

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// States visited, ending in [`RunState::Written`]
    pub history: Vec<RunState>,
    /// Number of elements in the catalog
    pub catalog_size: usize,
    /// Element files left out under the skip policy
    pub skipped_elements: Vec<PathBuf>,
    /// Number of region tasks dispatched
    pub regions: usize,
    /// Path of the written mosaic
    pub output: PathBuf,
}

/// Runs mosaic generation with a fixed configuration
pub struct MosaicGenerator<'a> {
    config: &'a MosaicConfig,
    progress: MosaicProgress,
}

impl<'a> MosaicGenerator<'a> {
    /// Create a generator with no progress display
    pub fn new(config: &'a MosaicConfig) -> Self {
        Self {
            config,
            progress: MosaicProgress::hidden(),
        }
    }

    /// Report region completion on `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: MosaicProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Configuration used by this generator
    pub const fn config(&self) -> &'a MosaicConfig {
        self.config
    }

    /// Build the element catalog for `elements_dir` on the worker pool
    ///
    /// # Errors
    ///
    /// Returns configuration, worker pool and catalog errors.
    pub fn build_catalog(&self, elements_dir: &Path) -> Result<BuildOutcome> {
        self.config.validate()?;
        let pool = self.worker_pool()?;
        pool.install(|| CatalogBuilder::new(self.config).build(elements_dir))
    }

    /// Render a mosaic of `source` from `catalog` without touching the disk
    ///
    /// `source` is converted to RGB and resized to the canvas first.
    ///
    /// # Errors
    ///
    /// Returns configuration, worker pool, task and assembly errors.
    pub fn render(&self, source: &DynamicImage, catalog: &Catalog) -> Result<Mosaic> {
        self.config.validate()?;
        let pool = self.worker_pool()?;
        let canvas_source = prepare_source(
            source,
            self.config.output_size,
            self.config.source_filter,
        );

        let index = ColorIndex::from_catalog(catalog);
        let resolver = TileResolver::new(catalog, &index);
        let regions = partition(self.config);
        let outputs = self.dispatch(&pool, &canvas_source, &resolver, &regions)?;

        assemble(self.config.output_size, self.config.tile_size, &outputs)
    }

    /// Generate the mosaic for `input` and write it to `output`
    ///
    /// Either the complete mosaic ends up at `output` or no file is created.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; the run is not retried.
    pub fn run(&self, input: &Path, output: &Path, elements_dir: &Path) -> Result<RunReport> {
        self.config.validate()?;

        let mut tracker = RunTracker::new();
        let result = self.worker_pool().and_then(|pool| {
            info!(
                input = %input.display(),
                elements = %elements_dir.display(),
                workers = pool.current_num_threads(),
                "starting mosaic run"
            );
            let outcome = pool.install(|| CatalogBuilder::new(self.config).build(elements_dir))?;
            self.run_tracked(&mut tracker, &pool, input, output, outcome)
        });
        if result.is_err() {
            tracker.fail();
        }
        result
    }

    /// Generate the mosaic for `input` from a catalog that is already built
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`], minus the catalog errors.
    pub fn run_with_catalog(
        &self,
        input: &Path,
        output: &Path,
        outcome: BuildOutcome,
    ) -> Result<RunReport> {
        self.config.validate()?;

        let mut tracker = RunTracker::new();
        let result = self
            .worker_pool()
            .and_then(|pool| self.run_tracked(&mut tracker, &pool, input, output, outcome));
        if result.is_err() {
            tracker.fail();
        }
        result
    }

    fn run_tracked(
        &self,
        tracker: &mut RunTracker,
        pool: &rayon::ThreadPool,
        input: &Path,
        output: &Path,
        outcome: BuildOutcome,
    ) -> Result<RunReport> {
        let started = Instant::now();
        let index = ColorIndex::from_catalog(&outcome.catalog);
        tracker.advance(RunState::CatalogBuilt)?;

        let decoded = load_source(input)?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "decoded input image"
        );
        let canvas_source = prepare_source(
            &decoded,
            self.config.output_size,
            self.config.source_filter,
        );
        drop(decoded);
        tracker.advance(RunState::CanvasPrepared)?;

        let regions = partition(self.config);
        let resolver = TileResolver::new(&outcome.catalog, &index);
        tracker.advance(RunState::TilesDispatched)?;
        let outputs = self.dispatch(pool, &canvas_source, &resolver, &regions)?;
        tracker.advance(RunState::TilesComplete)?;

        let mosaic = assemble(self.config.output_size, self.config.tile_size, &outputs)?;
        drop(outputs);
        write_atomically(&mosaic.canvas, output)?;
        tracker.advance(RunState::Written)?;

        info!(
            output = %output.display(),
            tiles = self.config.tile_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "mosaic written"
        );

        Ok(RunReport {
            history: tracker.history().to_vec(),
            catalog_size: outcome.catalog.len(),
            skipped_elements: outcome.skipped,
            regions: regions.len(),
            output: output.to_path_buf(),
        })
    }

    /// Process every region on `pool`, stopping at the first failure
    fn dispatch(
        &self,
        pool: &rayon::ThreadPool,
        source: &RgbImage,
        resolver: &TileResolver<'_>,
        regions: &[Region],
    ) -> Result<Vec<RegionOutput>> {
        let tile_size = self.config.tile_size;
        debug!(regions = regions.len(), "dispatching region tasks");
        self.progress.start(regions.len(), "regions");

        let outputs = pool.install(|| {
            regions
                .par_iter()
                .map(|&region| {
                    let output = process_region(source, region, resolver, tile_size);
                    self.progress.advance();
                    output
                })
                .collect::<Result<Vec<_>>>()
        });

        self.progress.finish();
        outputs
    }

    fn worker_pool(&self) -> Result<rayon::ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("{WORKER_THREAD_PREFIX}-{i}"));
        if let Some(threads) = self.config.worker_threads {
            builder = builder.num_threads(threads);
        }
        builder.build().map_err(|e| MosaicError::WorkerPool {
            reason: e.to_string(),
        })
    }
}

/// Generate a mosaic from the files at `input` and `elements_dir`
///
/// # Errors
///
/// See [`MosaicGenerator::run`].
pub fn create_mosaic(
    input: &Path,
    output: &Path,
    elements_dir: &Path,
    config: &MosaicConfig,
) -> Result<RunReport> {
    MosaicGenerator::new(config).run(input, output, elements_dir)
}
