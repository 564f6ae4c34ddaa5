//! End-to-end tests for stencil-xlsx.
//!
//! Each test assembles the template it needs in memory, edits it through
//! `WorkbookTemplate`, saves, and reopens the result to assert on it.

mod common;
mod editing;

pub use common::*;
