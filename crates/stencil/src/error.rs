//! Merge error types

use thiserror::Error;

/// Result type for merge operations
pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Errors raised by a merge.
///
/// Every error is fatal for the call that raised it; no output file is
/// written once an error has occurred.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Template or CSV asset could not be found
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// CSV has a header but no data rows
    #[error("CSV has no data rows")]
    EmptyDataset,

    /// CSV has no header row
    #[error("CSV has no header row")]
    EmptyHeader,

    /// Named worksheet is not in the workbook
    #[error("Sheet '{0}' not found in template")]
    MissingSheet(String),

    /// Document has no table
    #[error("No tables found in the document")]
    MissingTable,

    /// Header row index points at a row the sheet does not have
    #[error("Template header row {0} not found")]
    MissingHeaderRow(u32),

    /// Appended rows would run past the last row a sheet can hold
    #[error("{rows} rows from row {start} run past the end of the sheet")]
    SheetOverflow {
        /// First row written (0-based)
        start: u32,
        /// Number of rows to append
        rows: usize,
    },

    /// Output file name is not a plain path under the output directory
    #[error("Invalid output file name: {0}")]
    InvalidOutputName(String),

    /// No table's first row matches the CSV header
    #[error("No table found whose first row matches the CSV header")]
    NoMatchingTable,

    /// Target table has no rows
    #[error("Target table has no rows (need at least a header row)")]
    EmptyTable,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV input could not be read
    #[error(transparent)]
    Csv(#[from] stencil_csv::CsvError),

    /// Spreadsheet template is unreadable
    #[error(transparent)]
    Xlsx(#[from] stencil_xlsx::XlsxError),

    /// Document template is unreadable
    #[error(transparent)]
    Docx(#[from] stencil_docx::DocxError),
}
