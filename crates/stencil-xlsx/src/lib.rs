//! # stencil-xlsx
//!
//! XLSX template editing for stencil.
//!
//! A [`WorkbookTemplate`] keeps the whole package and parses only what a merge
//! edits: the workbook part, its worksheets and the shared string table.
//! Values are written through [`CellWriter`], which implements
//! [`stencil_core::CellSink`] so that coerced CSV values land as numbers,
//! date serials, booleans or shared strings.
//!
//! ```no_run
//! use stencil_core::{coerce::write_value, CellAddress};
//! use stencil_xlsx::WorkbookTemplate;
//!
//! let mut wb = WorkbookTemplate::open_file("template.xlsx")?;
//! write_value(&mut wb.cell_writer(0, CellAddress::new(1, 0))?, "42");
//! wb.set_force_formula_recalculation();
//! wb.save("out.xlsx")?;
//! # Ok::<(), stencil_xlsx::XlsxError>(())
//! ```

pub mod cell;
pub mod error;
pub mod serial;
pub mod shared_strings;
pub mod workbook;
pub mod worksheet;

mod ns;

pub use cell::{CellKind, CellWriter};
pub use error::{XlsxError, XlsxResult};
pub use ns::{SPREADSHEET_NS, SPREADSHEET_STRICT_NS};
pub use serial::date_time_to_serial;
pub use shared_strings::SharedStrings;
pub use workbook::WorkbookTemplate;
pub use worksheet::Worksheet;
