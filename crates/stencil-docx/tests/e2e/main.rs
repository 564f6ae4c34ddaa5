//! End-to-end tests for DOCX template editing.

mod common;
mod editing;

pub use common::*;
