//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvOptions;
use stencil_core::RecordMap;

/// A parsed CSV document: trimmed header plus non-blank data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Header field names, trimmed of surrounding whitespace
    pub header: Vec<String>,
    /// Data rows in input order, blank rows removed
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the header has no fields at all (empty input)
    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    /// Record map of the data row at `index`
    pub fn record(&self, index: usize) -> Option<RecordMap> {
        self.rows
            .get(index)
            .map(|row| RecordMap::from_row(&self.header, row))
    }

    /// Record maps of all data rows, in order
    pub fn records(&self) -> impl Iterator<Item = RecordMap> + '_ {
        self.rows
            .iter()
            .map(move |row| RecordMap::from_row(&self.header, row))
    }
}

/// CSV reader
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    options: CsvOptions,
}

impl CsvReader {
    /// Create a reader with the given options
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Read and parse a CSV file
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> CsvResult<CsvTable> {
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read UTF-8 text from a reader and parse it
    pub fn read<R: Read>(&self, mut reader: R) -> CsvResult<CsvTable> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(bytes)
    }

    /// Parse raw UTF-8 bytes
    pub fn parse_bytes(&self, bytes: Vec<u8>) -> CsvResult<CsvTable> {
        let text = String::from_utf8(bytes)?;
        Ok(self.parse(&text))
    }

    /// Parse CSV text. Never fails.
    ///
    /// ```
    /// use stencil_csv::CsvReader;
    ///
    /// let table = CsvReader::default().parse("Name, Age\nAlice,30\n,\n");
    /// assert_eq!(table.header, vec!["Name", "Age"]);
    /// assert_eq!(table.rows, vec![vec!["Alice", "30"]]);
    /// ```
    pub fn parse(&self, text: &str) -> CsvTable {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = split_lines(text).map(|line| parse_line(line, self.options.delimiter));

        let header = match lines.next() {
            Some(fields) => fields.into_iter().map(|f| f.trim().to_string()).collect(),
            None => return CsvTable::default(),
        };

        let rows = lines
            .filter(|fields| fields.iter().any(|f| !f.trim().is_empty()))
            .collect();

        CsvTable { header, rows }
    }
}

/// Split a single physical line into fields.
///
/// Outside quotes a `"` opens a quoted section and `delimiter` ends the
/// field. Inside quotes `""` is a literal quote and a lone `"` closes the
/// section. A quote left open at the end of the line closes implicitly.
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    fields.push(current);
    fields
}

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// A terminator at the very end does not start another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        if current.is_empty() {
            rest = None;
            return None;
        }
        match current.find(|c: char| c == '\r' || c == '\n') {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
