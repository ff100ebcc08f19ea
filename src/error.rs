//! Error types for the sandpile simulation.

use thiserror::Error;

/// Result type for sandpile operations.
pub type Result<T> = std::result::Result<T, SandpileError>;

/// Errors that can occur while building, running or exporting a simulation.
#[derive(Error, Debug)]
pub enum SandpileError {
    /// Initial configuration is empty, ragged, or disagrees with its declared size.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A seed value is too large to stabilise without overflowing a cell.
    #[error("Cell ({row}, {col}) holds {value} grains, above the supported maximum")]
    GrainOverflow { row: usize, col: usize, value: u32 },

    /// Padded-space index outside the buffer.
    #[error("Index ({row}, {col}) out of bounds for padded grid {rows}x{cols}")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Attempt to write into the absorbing border.
    #[error("Cell ({row}, {col}) is part of the sink border and cannot be written")]
    BorderWrite { row: usize, col: usize },

    /// Malformed configuration text.
    #[error("Ingestion error at line {line}: {message}")]
    Ingestion { line: usize, message: String },

    /// IO error while reading the configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding or writing failed.
    #[error("Rendering error: {0}")]
    Rendering(#[from] image::ImageError),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid simulation settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SandpileError {
    pub(crate) fn ingestion(line: usize, message: impl Into<String>) -> Self {
        SandpileError::Ingestion {
            line,
            message: message.into(),
        }
    }
}
