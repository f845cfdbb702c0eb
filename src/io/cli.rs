//! Command-line interface for generating a single mosaic

use crate::io::configuration::{DecodePolicy, Dispatch, MosaicConfig};
use crate::io::error::Result;
use crate::io::progress::MosaicProgress;
use crate::mosaic::orchestrator::{MosaicGenerator, RunReport};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Rebuild an image as a mosaic of element images"
)]
/// Command-line arguments for the mosaic generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Target image to approximate
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the mosaic to write (format from extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Directory of element images used as tiles
    #[arg(short, long, value_name = "DIR")]
    pub elements: PathBuf,

    /// Abort when an element image cannot be decoded instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Dispatch one task per tile instead of one per chunk
    #[arg(long)]
    pub per_tile: bool,

    /// Number of worker threads (defaults to one per core)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output and informational logs
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration from the default constants and flags
    pub fn to_config(&self) -> MosaicConfig {
        MosaicConfig {
            dispatch: if self.per_tile {
                Dispatch::PerTile
            } else {
                Dispatch::Chunked
            },
            decode_policy: if self.strict {
                DecodePolicy::Abort
            } else {
                DecodePolicy::Skip
            },
            worker_threads: self.threads,
            ..MosaicConfig::default()
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter when `RUST_LOG` is not set
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            "tilemosaic=warn"
        } else if self.verbose {
            "tilemosaic=debug"
        } else {
            "tilemosaic=info"
        }
    }
}

/// Runs one mosaic generation for parsed CLI arguments
pub struct MosaicCommand {
    cli: Cli,
    config: MosaicConfig,
}

impl MosaicCommand {
    /// Create a command with the configuration derived from `cli`
    pub fn new(cli: Cli) -> Self {
        let config = cli.to_config();
        Self { cli, config }
    }

    /// Configuration the command will run with
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Generate and write the mosaic
    ///
    /// # Errors
    ///
    /// Returns any configuration, decode, processing or write error.
    pub fn run(&self) -> Result<RunReport> {
        let progress = if self.cli.should_show_progress() {
            MosaicProgress::new()
        } else {
            MosaicProgress::hidden()
        };

        let report = MosaicGenerator::new(&self.config)
            .with_progress(progress)
            .run(&self.cli.input, &self.cli.output, &self.cli.elements)?;

        info!(
            elements = report.catalog_size,
            skipped = report.skipped_elements.len(),
            regions = report.regions,
            "done: {}",
            report.output.display()
        );
        Ok(report)
    }
}
