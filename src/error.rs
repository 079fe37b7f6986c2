//! Error types for dyeflow.

use thiserror::Error;

/// Errors raised while configuring a simulation or moving its output around.
///
/// The solver stages themselves never fail: coordinates are clamped and every
/// field is sized once at construction.
#[derive(Debug, Error)]
pub enum FluidError {
    /// Grid size or fluid parameters that the solver cannot work with.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Destination buffer passed to `draw` has the wrong length.
    #[error("output buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// Length the buffer must have.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
