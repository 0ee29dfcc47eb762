use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading an embedding table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Model file not found. Expected at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header: {0}")]
    BadHeader(String),

    #[error("invalid row {row}: {reason}")]
    BadRow { row: usize, reason: String },

    #[error("dimension mismatch at row {row}: expected {expected}, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("header announces {expected} rows, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding table is empty")]
    Empty,
}
