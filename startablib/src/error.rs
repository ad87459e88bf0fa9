//! Error types for startablib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during table conversion or moment estimation
#[derive(Error, Debug)]
pub enum StartabError {
    /// Failed to read the input table
    #[error("failed to read table '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Failed to write converted output
    #[error("failed to write output: {0}")]
    OutputWrite(#[source] std::io::Error),

    /// A CSV cell could not be parsed as a number
    #[error("row {row}, column {column}: cannot parse '{value}' as a number")]
    BadCell {
        row: usize,
        column: usize,
        value: String,
    },

    /// A CSV row has fewer columns than requested
    #[error("row {row} has {found} columns, column index {column} requested")]
    ShortRow {
        row: usize,
        column: usize,
        found: usize,
    },

    /// Moment estimators need at least one sample
    #[error("no samples: {0}")]
    EmptyInput(&'static str),

    /// Input arrays to a moment estimator differ in length
    #[error("array length mismatch: {0}")]
    LengthMismatch(&'static str),

    /// A per-point covariance matrix cannot be inverted
    #[error("singular covariance matrix at sample {0}")]
    SingularCovariance(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
