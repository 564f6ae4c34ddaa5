//! Spreadsheet merges: placeholder filling and table appending

use std::path::PathBuf;

use stencil_core::coerce::write_value;
use stencil_core::{CellAddress, Delimiters, PlaceholderTokenizer, MAX_ROWS};
use stencil_csv::{CsvOptions, CsvTable};
use stencil_xlsx::WorkbookTemplate;

use crate::assets::{AssetSource, OutputDir};
use crate::error::{MergeError, MergeResult};
use crate::options::{MergeOptions, SheetFillOptions, TableAppendOptions};
use crate::{changed_text, read_csv};

/// Merges CSV data into `.xlsx` templates.
///
/// Spreadsheet placeholders are written `${Name}`.
#[derive(Debug, Clone)]
pub struct SpreadsheetMergeEngine<A> {
    assets: A,
    output: OutputDir,
    csv: CsvOptions,
    fill_options: SheetFillOptions,
    append_options: TableAppendOptions,
}

impl<A: AssetSource> SpreadsheetMergeEngine<A> {
    /// Engine reading from `assets` and writing into `output`, with default options
    pub fn new(assets: A, output: OutputDir) -> Self {
        Self {
            assets,
            output,
            csv: CsvOptions::default(),
            fill_options: SheetFillOptions::default(),
            append_options: TableAppendOptions::default(),
        }
    }

    /// Use the CSV, fill and append sections of `options`
    pub fn with_options(mut self, options: &MergeOptions) -> Self {
        self.csv = options.csv.clone();
        self.fill_options = options.sheet_fill.clone();
        self.append_options = options.table_append.clone();
        self
    }

    /// Fill `${Name}` placeholders in every text cell of every sheet with the
    /// first CSV data row, and write the result to `output`.
    pub fn fill_first_record(&self, template: &str, csv: &str, output: &str) -> MergeResult<PathBuf> {
        let template = self.assets.open(template)?;
        let data = read_csv(&self.assets, csv, &self.csv)?;
        let bytes = self.fill(&template, &data)?;
        self.output.write(output, &bytes)
    }

    /// Append every CSV data row below the header row of a sheet (the named
    /// one, or the first), and write the result to `output`.
    pub fn append_table(
        &self,
        template: &str,
        csv: &str,
        output: &str,
        sheet_name: Option<&str>,
        header_row: u32,
    ) -> MergeResult<PathBuf> {
        let template = self.assets.open(template)?;
        let data = read_csv(&self.assets, csv, &self.csv)?;
        let bytes = self.append(&template, &data, sheet_name, header_row)?;
        self.output.write(output, &bytes)
    }

    /// In-memory form of [`fill_first_record`](Self::fill_first_record)
    pub fn fill(&self, template: &[u8], data: &CsvTable) -> MergeResult<Vec<u8>> {
        let record = data.record(0).ok_or(MergeError::EmptyDataset)?;
        let mut wb = WorkbookTemplate::open(template)?;
        let tokens = PlaceholderTokenizer::new(Delimiters::dollar_brace());

        let changed = wb.rewrite_text_cells(|text| changed_text(tokens.substitute(text, &record)))?;
        tracing::debug!(changed, sheets = wb.sheet_count(), "filled placeholders");

        if self.fill_options.force_recalculation {
            wb.set_force_formula_recalculation();
        }
        Ok(wb.to_bytes()?)
    }

    /// In-memory form of [`append_table`](Self::append_table)
    pub fn append(
        &self,
        template: &[u8],
        data: &CsvTable,
        sheet_name: Option<&str>,
        header_row: u32,
    ) -> MergeResult<Vec<u8>> {
        let mut wb = WorkbookTemplate::open(template)?;
        let sheet = match sheet_name {
            Some(name) => wb
                .sheet_index(name)
                .ok_or_else(|| MergeError::MissingSheet(name.to_string()))?,
            None if wb.sheet_count() > 0 => 0,
            None => return Err(MergeError::MissingSheet("(first sheet)".to_string())),
        };

        // Style source for every appended row
        let model_row = header_row
            .checked_add(1)
            .filter(|row| *row < MAX_ROWS)
            .ok_or(MergeError::MissingHeaderRow(header_row))?;
        if model_row as usize + data.row_count() > MAX_ROWS as usize {
            return Err(MergeError::SheetOverflow {
                start: model_row,
                rows: data.row_count(),
            });
        }
        wb.ensure_row(sheet, model_row)?;

        if !data.has_header() {
            return Err(MergeError::EmptyHeader);
        }
        if !wb.sheet(sheet)?.has_row(header_row) {
            return Err(MergeError::MissingHeaderRow(header_row));
        }

        let width = wb.sheet(sheet)?.last_cell_num(header_row);
        let mut columns = Vec::with_capacity(width as usize);
        for col in 0..width {
            let text = wb
                .cell_text(sheet, CellAddress::new(header_row, col))?
                .unwrap_or_default();
            let text = text.trim();
            if !text.is_empty() {
                columns.push((col, text.to_string()));
            }
        }
        tracing::debug!(sheet, header_row, columns = columns.len(), "resolved template columns");

        let mut write_row = model_row;
        for record in data.records() {
            let style_width = wb.sheet(sheet)?.last_cell_num(model_row).max(1);
            wb.copy_row_style(sheet, model_row, write_row, style_width)?;

            for (col, name) in &columns {
                let raw = record.get(name).unwrap_or("");
                let mut writer = wb.cell_writer(sheet, CellAddress::new(write_row, *col))?;
                write_value(&mut writer, raw);
            }
            write_row += 1;
        }
        tracing::debug!(sheet, rows = data.row_count(), "appended rows");

        if self.append_options.force_recalculation {
            wb.set_force_formula_recalculation();
        }
        Ok(wb.to_bytes()?)
    }
}
