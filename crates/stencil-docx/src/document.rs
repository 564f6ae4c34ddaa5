//! Document template: the package plus its main document part

use std::path::Path;

use stencil_opc::{Package, XmlDocument, XmlElement, XmlNode};

use crate::error::{DocxError, DocxResult};
use crate::names::WordNames;
use crate::paragraph::{paragraph_text, set_plain_text, Emphasis, ParagraphRewrite};
use crate::table;

/// Where a paragraph sits in the document body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphScope {
    /// A paragraph directly in the body
    Body,
    /// A paragraph in a cell of a body-level table
    TableCell {
        /// Index of the table among body-level tables
        table: usize,
        /// Number of rows of that table
        table_rows: usize,
    },
}

/// A DOCX template opened for editing.
///
/// Only the main document part is parsed; headers, footers, styles, media
/// and every other part are carried through unchanged.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    package: Package,
    part: String,
    doc: XmlDocument,
    names: WordNames,
    dirty: bool,
}

impl DocumentTemplate {
    /// Open a template from its bytes
    pub fn open(bytes: &[u8]) -> DocxResult<Self> {
        Self::from_package(Package::from_bytes(bytes)?)
    }

    /// Open a template from a file
    pub fn open_file<P: AsRef<Path>>(path: P) -> DocxResult<Self> {
        Self::from_package(Package::read_file(path)?)
    }

    /// Wrap an already loaded package
    pub fn from_package(package: Package) -> DocxResult<Self> {
        let part = match package.main_document_part() {
            Ok(part) => part,
            Err(_) if package.has_part("word/document.xml") => "word/document.xml".to_string(),
            Err(e) => return Err(e.into()),
        };
        let doc = package.xml_part(&part)?;
        let names = WordNames::for_root(&doc.root);

        if doc.root.child(&names.body).is_none() {
            return Err(DocxError::InvalidFormat(format!("{}: document has no body", part)));
        }

        let template = Self {
            package,
            part,
            doc,
            names,
            dirty: false,
        };
        tracing::debug!(
            part = %template.part,
            paragraphs = template.paragraph_count(),
            tables = template.table_count(),
            "opened document template"
        );
        Ok(template)
    }

    /// Qualified element names used by this document
    pub fn names(&self) -> &WordNames {
        &self.names
    }

    /// Body-level elements with the given name
    fn body_elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.doc
            .root
            .child(&self.names.body)
            .into_iter()
            .flat_map(move |body| body.elements_named(name))
    }

    fn body_mut(&mut self) -> DocxResult<&mut XmlElement> {
        let part = &self.part;
        self.doc
            .root
            .child_mut(&self.names.body)
            .ok_or_else(|| DocxError::InvalidFormat(format!("{}: document has no body", part)))
    }

    /// Number of body-level paragraphs
    pub fn paragraph_count(&self) -> usize {
        self.body_elements(&self.names.p).count()
    }

    /// Text of every body-level paragraph, in order
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.body_elements(&self.names.p)
            .map(|p| paragraph_text(p, &self.names))
            .collect()
    }

    /// Number of body-level tables
    pub fn table_count(&self) -> usize {
        self.body_elements(&self.names.tbl).count()
    }

    fn table(&self, index: usize) -> DocxResult<&XmlElement> {
        self.body_elements(&self.names.tbl)
            .nth(index)
            .ok_or(DocxError::TableIndex(index))
    }

    fn table_mut(&mut self, index: usize) -> DocxResult<&mut XmlElement> {
        let tbl = self.names.tbl.clone();
        self.body_mut()?
            .elements_mut()
            .filter(|e| e.name == tbl)
            .nth(index)
            .ok_or(DocxError::TableIndex(index))
    }

    /// Number of rows of a body-level table
    pub fn table_row_count(&self, index: usize) -> DocxResult<usize> {
        Ok(table::row_count(self.table(index)?, &self.names))
    }

    /// Header names of a table (see [`table::header_texts`])
    pub fn table_header(&self, index: usize) -> DocxResult<Option<Vec<String>>> {
        Ok(table::header_texts(self.table(index)?, &self.names))
    }

    /// Text of a table cell: its paragraphs joined with `\n`
    pub fn cell_text(&self, table: usize, row: usize, col: usize) -> DocxResult<String> {
        let cell = self.cell(table, row, col)?;
        let texts: Vec<String> = cell
            .elements_named(&self.names.p)
            .map(|p| paragraph_text(p, &self.names))
            .collect();
        Ok(texts.join("\n"))
    }

    fn cell(&self, table: usize, row: usize, col: usize) -> DocxResult<&XmlElement> {
        self.table(table)?
            .elements_named(&self.names.tr)
            .nth(row)
            .and_then(|r| r.elements_named(&self.names.tc).nth(col))
            .ok_or(DocxError::CellIndex { table, row, col })
    }

    /// Offer the text of every body paragraph, then of every paragraph in
    /// every cell of every body-level table, to `rewrite`.
    ///
    /// A paragraph for which `rewrite` returns a different text is rebuilt
    /// with `strategy`. Returns the number of paragraphs rebuilt.
    pub fn rewrite_paragraphs<F>(
        &mut self,
        strategy: ParagraphRewrite,
        emphasis: &Emphasis,
        mut rewrite: F,
    ) -> DocxResult<usize>
    where
        F: FnMut(ParagraphScope, &str) -> Option<String>,
    {
        let names = self.names.clone();
        let mut changed = 0;
        let mut apply = |scope: ParagraphScope, p: &mut XmlElement| {
            let original = paragraph_text(p, &names);
            match rewrite(scope, &original) {
                Some(replaced) if replaced != original => {
                    strategy.apply(p, &original, &replaced, emphasis, &names);
                    changed += 1;
                }
                _ => {}
            }
        };

        let body = self.body_mut()?;
        for p in body.elements_mut().filter(|e| e.name == names.p) {
            apply(ParagraphScope::Body, p);
        }

        for (index, tbl) in body
            .elements_mut()
            .filter(|e| e.name == names.tbl)
            .enumerate()
        {
            let scope = ParagraphScope::TableCell {
                table: index,
                table_rows: table::row_count(tbl, &names),
            };
            for row in tbl.elements_mut().filter(|e| e.name == names.tr) {
                for cell in row.elements_mut().filter(|e| e.name == names.tc) {
                    for p in cell.elements_mut().filter(|e| e.name == names.p) {
                        apply(scope, p);
                    }
                }
            }
        }

        if changed > 0 {
            self.dirty = true;
        }
        tracing::debug!(changed, "rewrote paragraphs");
        Ok(changed)
    }

    /// Append a row to a table (as wide as its first row), padded with empty
    /// cells up to `min_cells`. Returns the new row's index.
    pub fn append_row(&mut self, table: usize, min_cells: usize) -> DocxResult<usize> {
        let names = self.names.clone();
        let tbl = self.table_mut(table)?;
        let index = table::create_row(tbl, &names);

        if let Some(XmlNode::Element(row)) = tbl.children.last_mut() {
            while table::cell_count(row, &names) < min_cells {
                table::add_cell(row, &names);
            }
        }
        self.dirty = true;
        Ok(index)
    }

    /// Replace a cell's first paragraph content with one plain run holding
    /// `text`. A paragraph is created if the cell has none; other paragraphs
    /// are left alone.
    pub fn set_cell_text(&mut self, table: usize, row: usize, col: usize, text: &str) -> DocxResult<()> {
        let names = self.names.clone();
        let cell = self
            .table_mut(table)?
            .elements_mut()
            .filter(|e| e.name == names.tr)
            .nth(row)
            .and_then(|r| r.elements_mut().filter(|e| e.name == names.tc).nth(col))
            .ok_or(DocxError::CellIndex { table, row, col })?;

        if cell.child(&names.p).is_none() {
            cell.push_child(XmlElement::new(names.p.as_str()));
        }
        if let Some(p) = cell.child_mut(&names.p) {
            set_plain_text(p, text, &names);
        }
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) {
        if self.dirty {
            self.package.set_xml_part(&self.part, &self.doc);
        }
    }

    /// Serialize the edited template
    pub fn to_bytes(&mut self) -> DocxResult<Vec<u8>> {
        self.flush();
        Ok(self.package.to_bytes()?)
    }

    /// Save the edited template to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> DocxResult<()> {
        self.flush();
        Ok(self.package.save(path)?)
    }

    /// The underlying package (parts are current as of the last save)
    pub fn package(&self) -> &Package {
        &self.package
    }
}
