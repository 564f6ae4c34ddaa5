//! # stencil-docx
//!
//! DOCX template editing for stencil.
//!
//! A [`DocumentTemplate`] keeps the whole package and parses only the main
//! document part. Paragraph text is read across runs and rewritten with a
//! [`ParagraphRewrite`] strategy; tables grow through [`DocumentTemplate::append_row`].
//!
//! ```no_run
//! use stencil_docx::{DocumentTemplate, Emphasis, ParagraphRewrite};
//!
//! let mut doc = DocumentTemplate::open_file("letter.docx")?;
//! doc.rewrite_paragraphs(ParagraphRewrite::Uniform, &Emphasis::default(), |_, text| {
//!     Some(text.replace("«Name»", "Alice"))
//! })?;
//! doc.save("letter-alice.docx")?;
//! # Ok::<(), stencil_docx::DocxError>(())
//! ```

pub mod document;
pub mod error;
pub mod names;
pub mod paragraph;
pub mod table;

pub use document::{DocumentTemplate, ParagraphScope};
pub use error::{DocxError, DocxResult};
pub use names::{WordNames, WORD_NS, WORD_STRICT_NS};
pub use paragraph::{paragraph_text, Emphasis, ParagraphRewrite};
