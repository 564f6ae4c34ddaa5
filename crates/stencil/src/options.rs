//! Merge options
//!
//! Every options struct has a `Default` matching the behavior of the
//! hosting application the merges were written for, and can be loaded from
//! JSON through serde.

use serde::{Deserialize, Serialize};
use stencil_core::strip_wrapping;
use stencil_csv::CsvOptions;
use stencil_docx::{Emphasis, ParagraphRewrite};

/// Options for filling spreadsheet placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetFillOptions {
    /// Ask the spreadsheet application to recalculate formulas on open
    pub force_recalculation: bool,
}

impl Default for SheetFillOptions {
    fn default() -> Self {
        Self {
            force_recalculation: true,
        }
    }
}

/// Options for appending CSV rows to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableAppendOptions {
    /// How a document table's header row is matched against the CSV header
    pub header_match: HeaderMatch,
    /// Ask the spreadsheet application to recalculate formulas on open
    pub force_recalculation: bool,
}

impl Default for TableAppendOptions {
    fn default() -> Self {
        Self {
            header_match: HeaderMatch::default(),
            force_recalculation: true,
        }
    }
}

/// Which CSV row the option list is taken from in batch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSource {
    /// Every output uses the first data row's option list
    #[default]
    FirstRow,
    /// Each output uses its own row's option list
    CurrentRow,
}

/// Options for batch placeholder filling (one document per CSV row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchFillOptions {
    /// Which row the option list comes from
    pub option_source: OptionSource,
    /// Column holding the `|`-separated option list
    pub option_column: usize,
    /// Number of `OptionsN` placeholders (`Options1..=OptionsN`)
    pub option_slots: usize,
    /// Tables with exactly this many rows are filled from the option list
    pub options_table_rows: usize,
    /// Columns joined with `_` to name each output file
    pub file_name_fields: Vec<usize>,
    /// How changed paragraphs are rebuilt
    pub rewrite: ParagraphRewrite,
    /// Font size emphasis for one literal paragraph text
    pub emphasis: Emphasis,
}

impl Default for BatchFillOptions {
    fn default() -> Self {
        Self {
            option_source: OptionSource::FirstRow,
            option_column: 10,
            option_slots: 40,
            options_table_rows: 20,
            file_name_fields: vec![1, 2, 4, 9],
            rewrite: ParagraphRewrite::Uniform,
            emphasis: Emphasis::default(),
        }
    }
}

fn file_name_part(field: &str) -> String {
    match field {
        "." | ".." => "_".to_string(),
        _ => field
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect(),
    }
}

impl BatchFillOptions {
    /// Output file name for a row: the configured fields joined with `_`,
    /// plus `.docx`. Missing fields read as empty.
    ///
    /// Path separators, drive colons and control characters in a field
    /// become `_`, as does a field that is only `.` or `..`, so the name
    /// always stays a single path component.
    pub fn file_name(&self, row: &[String]) -> String {
        let parts: Vec<String> = self
            .file_name_fields
            .iter()
            .map(|&i| file_name_part(row.get(i).map_or("", String::as_str)))
            .collect();
        format!("{}.docx", parts.join("_"))
    }

    /// Names of the option placeholders: `Options1..=OptionsN`
    pub fn option_names(&self) -> Vec<String> {
        (1..=self.option_slots).map(|i| format!("Options{}", i)).collect()
    }

    /// Values for the option placeholders: the option column of `row` split
    /// on `|`, padded with `""` (extra values are dropped)
    pub fn option_values(&self, row: &[String]) -> Vec<String> {
        let list = row.get(self.option_column).map_or("", String::as_str);
        let mut values: Vec<String> = list.split('|').take(self.option_slots).map(str::to_string).collect();
        values.resize(self.option_slots, String::new());
        values
    }
}

/// How a document table's first row is matched against the CSV header.
///
/// Table header texts carry one wrapping character on each side (e.g.
/// `«Name»`), which is stripped before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatch {
    /// At least one stripped table header equals (case-sensitively) some
    /// CSV header name
    #[default]
    AnyOverlap,
    /// Same number of columns, with stripped table headers equal to the CSV
    /// header names in order, ignoring case
    ExactOrdered,
}

impl HeaderMatch {
    /// Whether a table with header texts `table` matches `csv`
    pub fn matches(self, table: &[String], csv: &[String]) -> bool {
        match self {
            HeaderMatch::AnyOverlap => table
                .iter()
                .filter_map(|h| strip_wrapping(h))
                .filter(|name| !name.trim().is_empty())
                .any(|name| csv.iter().any(|c| c == name)),
            HeaderMatch::ExactOrdered => {
                table.len() == csv.len()
                    && table.iter().zip(csv).all(|(h, c)| {
                        strip_wrapping(h).unwrap_or("").to_lowercase() == c.to_lowercase()
                    })
            }
        }
    }
}

/// All merge options, as loaded from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// CSV reading
    pub csv: CsvOptions,
    /// Spreadsheet placeholder filling
    pub sheet_fill: SheetFillOptions,
    /// Table appending (spreadsheet and document)
    pub table_append: TableAppendOptions,
    /// Batch document filling
    pub batch: BatchFillOptions,
}
