//! DOCX error types

use thiserror::Error;

/// Result type for DOCX operations
pub type DocxResult<T> = std::result::Result<T, DocxError>;

/// Errors that can occur while editing a DOCX template
#[derive(Debug, Error)]
pub enum DocxError {
    /// Package (zip / XML) error
    #[error(transparent)]
    Opc(#[from] stencil_opc::OpcError),

    /// Invalid file format
    #[error("Invalid DOCX format: {0}")]
    InvalidFormat(String),

    /// Table index past the end of the body
    #[error("Table index {0} out of range")]
    TableIndex(usize),

    /// Row or cell missing from a table
    #[error("Table {table} has no cell at row {row}, column {col}")]
    CellIndex { table: usize, row: usize, col: usize },
}
