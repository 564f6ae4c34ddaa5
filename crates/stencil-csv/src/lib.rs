//! # stencil-csv
//!
//! CSV reader for stencil merge data.
//!
//! One physical line is one record: quoted fields may contain the separator
//! and doubled quotes, but never a line break. The first line is the header;
//! data rows whose every field is blank are dropped.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvOptions;
pub use reader::{parse_line, CsvReader, CsvTable};
