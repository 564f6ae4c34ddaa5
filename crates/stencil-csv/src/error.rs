//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while reading CSV input
///
/// Parsing itself is total; only reading the bytes can fail.
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid UTF-8
    #[error("CSV input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
