//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while editing an XLSX template
#[derive(Debug, Error)]
pub enum XlsxError {
    /// Package (zip / XML) error
    #[error(transparent)]
    Opc(#[from] stencil_opc::OpcError),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Sheet index past the end of the workbook
    #[error("Sheet index {0} out of range")]
    SheetIndex(usize),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] stencil_core::Error),
}
