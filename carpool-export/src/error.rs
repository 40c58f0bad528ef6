//! Errors raised while rendering CSV.

use thiserror::Error;

/// Failure while producing a CSV payload.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    /// Flushing the in-memory buffer failed.
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[source] std::io::Error),
    /// The rendered bytes were not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
