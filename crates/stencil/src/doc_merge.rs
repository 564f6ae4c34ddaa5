//! Document merges: batch placeholder filling and table appending

use std::path::PathBuf;

use stencil_core::{strip_wrapping, Delimiters, PlaceholderTokenizer, RecordMap};
use stencil_csv::{CsvOptions, CsvTable};
use stencil_docx::{DocumentTemplate, ParagraphScope};

use crate::assets::{AssetSource, OutputDir};
use crate::error::{MergeError, MergeResult};
use crate::options::{BatchFillOptions, MergeOptions, OptionSource, TableAppendOptions};
use crate::{changed_text, read_csv};

/// Merges CSV data into `.docx` templates.
///
/// Document placeholders are written `«Name»`.
#[derive(Debug, Clone)]
pub struct DocumentMergeEngine<A> {
    assets: A,
    output: OutputDir,
    csv: CsvOptions,
    append_options: TableAppendOptions,
}

impl<A: AssetSource> DocumentMergeEngine<A> {
    /// Engine reading from `assets` and writing into `output`, with default options
    pub fn new(assets: A, output: OutputDir) -> Self {
        Self {
            assets,
            output,
            csv: CsvOptions::default(),
            append_options: TableAppendOptions::default(),
        }
    }

    /// Use the CSV and append sections of `options`
    pub fn with_options(mut self, options: &MergeOptions) -> Self {
        self.csv = options.csv.clone();
        self.append_options = options.table_append.clone();
        self
    }

    /// Write one filled copy of the template per CSV data row, named from the
    /// row's fields. Returns the path of the last file written.
    pub fn fill_placeholders_batch(
        &self,
        template: &str,
        csv: &str,
        options: &BatchFillOptions,
    ) -> MergeResult<PathBuf> {
        let template = self.assets.open(template)?;
        let data = read_csv(&self.assets, csv, &self.csv)?;
        if data.is_empty() {
            return Err(MergeError::EmptyDataset);
        }

        let mut last = None;
        for index in 0..data.row_count() {
            let (file_name, bytes) = self.render_row(&template, &data, index, options)?;
            last = Some(self.output.write(&file_name, &bytes)?);
        }
        last.ok_or(MergeError::EmptyDataset)
    }

    /// Fill a fresh copy of the template from data row `index`.
    ///
    /// Returns the output file name and the document bytes.
    pub fn render_row(
        &self,
        template: &[u8],
        data: &CsvTable,
        index: usize,
        options: &BatchFillOptions,
    ) -> MergeResult<(String, Vec<u8>)> {
        let row = data.rows.get(index).ok_or(MergeError::EmptyDataset)?;
        let record = RecordMap::from_row(&data.header, row);

        let option_row = match options.option_source {
            OptionSource::FirstRow => data.rows.first().unwrap_or(row),
            OptionSource::CurrentRow => row,
        };
        let option_record = RecordMap::from_pairs(
            options
                .option_names()
                .into_iter()
                .zip(options.option_values(option_row)),
        );

        let mut doc = DocumentTemplate::open(template)?;
        let tokens = PlaceholderTokenizer::new(Delimiters::guillemets());
        let changed = doc.rewrite_paragraphs(options.rewrite, &options.emphasis, |scope, text| {
            let values = match scope {
                ParagraphScope::TableCell { table_rows, .. } if table_rows == options.options_table_rows => {
                    &option_record
                }
                _ => &record,
            };
            changed_text(tokens.substitute(text, values))
        })?;

        let file_name = options.file_name(row);
        tracing::debug!(row = index, changed, file = %file_name, "filled document");
        Ok((file_name, doc.to_bytes()?))
    }

    /// Append every CSV data row to a table of the template, and write the
    /// result to `output`.
    ///
    /// With `match_by_header`, the target is the first table whose header row
    /// matches the CSV header; otherwise it is the first table.
    pub fn append_table_rows(
        &self,
        template: &str,
        csv: &str,
        output: &str,
        match_by_header: bool,
    ) -> MergeResult<PathBuf> {
        let template = self.assets.open(template)?;
        let data = read_csv(&self.assets, csv, &self.csv)?;
        let bytes = self.append(&template, &data, match_by_header)?;
        self.output.write(output, &bytes)
    }

    /// In-memory form of [`append_table_rows`](Self::append_table_rows)
    pub fn append(&self, template: &[u8], data: &CsvTable, match_by_header: bool) -> MergeResult<Vec<u8>> {
        let mut doc = DocumentTemplate::open(template)?;
        if !data.has_header() {
            return Err(MergeError::EmptyHeader);
        }

        let table = if match_by_header {
            self.find_table(&doc, &data.header)?
                .ok_or(MergeError::NoMatchingTable)?
        } else if doc.table_count() > 0 {
            0
        } else {
            return Err(MergeError::MissingTable);
        };
        let header = doc.table_header(table)?.ok_or(MergeError::EmptyTable)?;
        tracing::debug!(table, columns = header.len(), "resolved target table");

        for record in data.records() {
            let row = doc.append_row(table, header.len())?;
            for (col, name) in header.iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                let value = strip_wrapping(name)
                    .and_then(|key| record.get(key))
                    .unwrap_or("");
                doc.set_cell_text(table, row, col, value)?;
            }
        }
        tracing::debug!(table, rows = data.row_count(), "appended rows");

        Ok(doc.to_bytes()?)
    }

    /// Index of the first table whose header row matches `csv_header`
    fn find_table(&self, doc: &DocumentTemplate, csv_header: &[String]) -> MergeResult<Option<usize>> {
        for index in 0..doc.table_count() {
            // Tables without rows never match
            if let Some(header) = doc.table_header(index)? {
                if self.append_options.header_match.matches(&header, csv_header) {
                    return Ok(Some(index));
                }
            }
        }
        Ok(None)
    }
}
