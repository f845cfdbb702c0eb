/// Command-line parsing and the mosaic command
pub mod cli;
/// Constants and run configuration
pub mod configuration;
/// Error types
pub mod error;
/// Image decoding, resampling and export
pub mod image;
/// Progress display
pub mod progress;
