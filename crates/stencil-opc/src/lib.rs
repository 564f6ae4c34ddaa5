//! # stencil-opc
//!
//! Open Packaging Convention plumbing shared by the XLSX and DOCX templates.
//!
//! - [`Package`] - every part of a zip package, kept in original order so that
//!   parts a merge never touches are written back unchanged
//! - [`XmlDocument`] / [`XmlElement`] - a small mutable element tree for the
//!   parts a merge does edit
//! - [`Relationships`] - `.rels` parsing, target resolution and editing

pub mod error;
pub mod package;
pub mod rels;
pub mod xml;

pub use error::{OpcError, OpcResult};
pub use package::{Package, CONTENT_TYPES_PART};
pub use rels::{Relationship, Relationships};
pub use xml::{XmlDocument, XmlElement, XmlNode};

/// Relationship type of the package's main document part
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
