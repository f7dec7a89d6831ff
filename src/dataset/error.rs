use chrono::ParseError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read metadata for data file '{0}'")]
    Metadata(PathBuf, #[source] std::io::Error),

    #[error("Failed to create data directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV data file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    // Errors during CSV writing (inside blocking task)
    #[error("I/O error writing CSV data file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing CSV data file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),

    #[error("Required column '{0}' not found in data file")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Row {row} has no date")]
    MissingDate { row: usize },

    #[error("Row {row} has an invalid date '{value}'")]
    InvalidDate {
        row: usize,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
