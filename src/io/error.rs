//! Error types for catalog construction, tile processing and mosaic output

use std::fmt;
use std::path::PathBuf;

use crate::mosaic::region::Region;
use crate::mosaic::state::RunState;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// The elements directory produced no decodable images
    CatalogEmpty {
        /// Directory that was scanned
        directory: PathBuf,
        /// Number of files that were rejected while scanning
        skipped: usize,
    },

    /// An element image could not be decoded
    ElementDecode {
        /// Path to the element file
        path: PathBuf,
        /// Underlying decoding error
        source: image::ImageError,
    },

    /// The target image could not be decoded
    InputDecode {
        /// Path to the target image
        path: PathBuf,
        /// Underlying decoding error
        source: image::ImageError,
    },

    /// The output size is not an exact multiple of the tile size
    DimensionMismatch {
        /// Configured canvas edge length
        output_size: u32,
        /// Configured tile edge length
        tile_size: u32,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A region task failed while it was being processed
    WorkerTask {
        /// Region the task was responsible for
        region: Region,
        /// Description of the failure
        reason: String,
    },

    /// The worker pool could not be started
    WorkerPool {
        /// Description of the failure
        reason: String,
    },

    /// Region outputs did not tile the canvas exactly once
    Assembly {
        /// Description of the coverage problem
        reason: String,
    },

    /// The run state machine was driven out of order
    InvalidTransition {
        /// State the run was in
        from: RunState,
        /// State that was requested
        to: RunState,
    },

    /// Encoding or writing the finished canvas failed
    OutputWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying encoding or I/O error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogEmpty { directory, skipped } => {
                write!(
                    f,
                    "No usable element images in '{}' ({skipped} file(s) skipped)",
                    directory.display()
                )
            }
            Self::ElementDecode { path, source } => {
                write!(f, "Failed to decode element '{}': {source}", path.display())
            }
            Self::InputDecode { path, source } => {
                write!(f, "Failed to decode input '{}': {source}", path.display())
            }
            Self::DimensionMismatch {
                output_size,
                tile_size,
            } => {
                write!(
                    f,
                    "Output size {output_size} is not divisible by tile size {tile_size}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::WorkerTask { region, reason } => {
                write!(f, "Task for region {region} failed: {reason}")
            }
            Self::WorkerPool { reason } => {
                write!(f, "Failed to start worker pool: {reason}")
            }
            Self::Assembly { reason } => {
                write!(f, "Canvas assembly failed: {reason}")
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid run state transition {from} -> {to}")
            }
            Self::OutputWrite { path, source } => {
                write!(f, "Failed to write mosaic to '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ElementDecode { source, .. }
            | Self::InputDecode { source, .. }
            | Self::OutputWrite { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a worker task error for the given region
pub fn worker_task_error(region: Region, reason: &impl ToString) -> MosaicError {
    MosaicError::WorkerTask {
        region,
        reason: reason.to_string(),
    }
}

/// Wrap an I/O failure on the output path as an output write error
pub fn output_io_error(path: impl Into<PathBuf>, source: std::io::Error) -> MosaicError {
    MosaicError::OutputWrite {
        path: path.into(),
        source: image::ImageError::IoError(source),
    }
}
