/// Error types for the PVA pipeline
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PVA operations.
///
/// The first three variants are fatal for a pipeline run; everything
/// row-level is absorbed into `None` values long before an error is built.
#[derive(Error, Debug)]
pub enum PvaError {
    /// A required input file does not exist
    #[error("missing input file: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The remote weather service could not deliver usable data
    #[error("data source unavailable ({endpoint}): {reason}")]
    SourceUnavailable { endpoint: String, reason: String },

    /// A merged file lacks a column the report needs
    #[error("missing required column '{column}' in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// The weather payload did not have the expected shape
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Failed to open or read a workbook
    #[error("failed to read spreadsheet {}: {reason}", path.display())]
    Spreadsheet { path: PathBuf, reason: String },

    /// Failed to read or write CSV data
    #[error("failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The report template failed to render
    #[error("failed to render report: {0}")]
    Render(String),
}

/// Type alias for Results using PvaError
pub type Result<T> = std::result::Result<T, PvaError>;
