//! Aggregation error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading archive files
///
/// Malformed rows never surface here; they are filtered by
/// [`crate::row::validate_row`]. Only failures to read a file at all do.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Failed to read archive directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open archive file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}
