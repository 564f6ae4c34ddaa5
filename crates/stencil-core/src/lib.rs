//! # stencil-core
//!
//! Core building blocks shared by the stencil merge engines.
//!
//! This crate provides:
//! - [`RecordMap`] - Case-insensitive view of one CSV row, keyed by header names
//! - [`PlaceholderTokenizer`] - Literal `open + name + close` token substitution
//! - [`CoercedValue`] and [`CellSink`] - Number / date / boolean / text inference
//! - [`CellAddress`] and [`CellRange`] - A1-style cell addressing
//!
//! ## Example
//!
//! ```rust
//! use stencil_core::{Delimiters, PlaceholderTokenizer, RecordMap};
//!
//! let record = RecordMap::from_row(&["Name", "Age"], &["Alice", "30"]);
//! let tokens = PlaceholderTokenizer::new(Delimiters::dollar_brace());
//!
//! assert_eq!(tokens.substitute("Hello ${Name}", &record), "Hello Alice");
//! assert_eq!(record.get("age"), Some("30"));
//! ```

pub mod address;
pub mod coerce;
pub mod error;
pub mod placeholder;
pub mod record;

pub use address::{CellAddress, CellRange};
pub use coerce::{CellSink, CoercedValue};
pub use error::{Error, Result};
pub use placeholder::{strip_wrapping, Delimiters, PlaceholderTokenizer};
pub use record::RecordMap;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
