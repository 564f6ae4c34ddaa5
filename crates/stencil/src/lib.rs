//! # stencil
//!
//! Merge CSV rows into spreadsheet (`.xlsx`) and word-processor (`.docx`)
//! templates.
//!
//! ## Features
//!
//! - Fill `${Name}` placeholders across every sheet of a workbook
//! - Append CSV rows below a sheet's header row with number, date and
//!   boolean inference and row style propagation
//! - Fill `«Name»` placeholders in documents, one output per CSV row
//! - Append CSV rows to the document table whose header matches the CSV
//!
//! Every part of a template that a merge does not touch is written back
//! unchanged.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stencil::{DirAssets, OutputDir, Stencil};
//!
//! let stencil = Stencil::new(DirAssets::new("assets"), OutputDir::new("out"));
//! let path = stencil.fill_spreadsheet_from_csv("Template.xlsx", "Data.csv", "Output_Filled.xlsx")?;
//! println!("wrote {}", path.display());
//! # Ok::<(), stencil::MergeError>(())
//! ```

pub mod assets;
pub mod doc_merge;
pub mod error;
pub mod options;
pub mod sheet_merge;

use std::borrow::Cow;
use std::path::PathBuf;

pub use assets::{AssetSource, DirAssets, MemoryAssets, OutputDir};
pub use doc_merge::DocumentMergeEngine;
pub use error::{MergeError, MergeResult};
pub use options::{
    BatchFillOptions, HeaderMatch, MergeOptions, OptionSource, SheetFillOptions, TableAppendOptions,
};
pub use sheet_merge::SpreadsheetMergeEngine;

// Re-export the types that appear in the public API
pub use stencil_core::{CellAddress, Delimiters, PlaceholderTokenizer, RecordMap};
pub use stencil_csv::{CsvOptions, CsvReader, CsvTable};
pub use stencil_docx::{Emphasis, ParagraphRewrite};

/// Entry point bundling an asset source, an output directory and options
#[derive(Debug, Clone)]
pub struct Stencil<A> {
    assets: A,
    output: OutputDir,
    options: MergeOptions,
}

impl<A: AssetSource> Stencil<A> {
    /// Merges reading from `assets` and writing into `output`, with default options
    pub fn new(assets: A, output: OutputDir) -> Self {
        Self::with_options(assets, output, MergeOptions::default())
    }

    /// Merges with explicit options
    pub fn with_options(assets: A, output: OutputDir, options: MergeOptions) -> Self {
        Self {
            assets,
            output,
            options,
        }
    }

    /// The merge options
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Spreadsheet engine borrowing this facade's assets
    pub fn spreadsheets(&self) -> SpreadsheetMergeEngine<&A> {
        SpreadsheetMergeEngine::new(&self.assets, self.output.clone()).with_options(&self.options)
    }

    /// Document engine borrowing this facade's assets
    pub fn documents(&self) -> DocumentMergeEngine<&A> {
        DocumentMergeEngine::new(&self.assets, self.output.clone()).with_options(&self.options)
    }

    /// Fill `${Name}` placeholders from the first CSV data row
    pub fn fill_spreadsheet_from_csv(&self, template: &str, csv: &str, output: &str) -> MergeResult<PathBuf> {
        self.spreadsheets().fill_first_record(template, csv, output)
    }

    /// Append CSV rows below row `header_row` of a sheet (the named one, or the first)
    pub fn append_spreadsheet_table_from_csv(
        &self,
        template: &str,
        csv: &str,
        output: &str,
        sheet_name: Option<&str>,
        header_row: u32,
    ) -> MergeResult<PathBuf> {
        self.spreadsheets()
            .append_table(template, csv, output, sheet_name, header_row)
    }

    /// Write one filled document per CSV data row; returns the last path written
    pub fn fill_document_placeholders_from_csv_batch(
        &self,
        template: &str,
        csv: &str,
        options: &BatchFillOptions,
    ) -> MergeResult<PathBuf> {
        self.documents().fill_placeholders_batch(template, csv, options)
    }

    /// Append CSV rows to a document table
    pub fn append_document_table_from_csv(
        &self,
        template: &str,
        csv: &str,
        output: &str,
        match_by_header: bool,
    ) -> MergeResult<PathBuf> {
        self.documents()
            .append_table_rows(template, csv, output, match_by_header)
    }
}

/// Read and parse a CSV asset
pub(crate) fn read_csv<A: AssetSource>(assets: &A, name: &str, options: &CsvOptions) -> MergeResult<CsvTable> {
    let bytes = assets.open(name)?;
    let table = CsvReader::new(options.clone()).parse_bytes(bytes)?;
    tracing::debug!(
        csv = name,
        columns = table.header.len(),
        rows = table.row_count(),
        "read CSV"
    );
    Ok(table)
}

/// The substituted text, if substitution replaced anything
pub(crate) fn changed_text(text: Cow<'_, str>) -> Option<String> {
    match text {
        Cow::Owned(text) => Some(text),
        Cow::Borrowed(_) => None,
    }
}
