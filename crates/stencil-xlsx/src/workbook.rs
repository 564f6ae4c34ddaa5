//! Workbook template: the package plus the parts a merge edits

use std::path::Path;

use stencil_core::CellAddress;
use stencil_opc::{Package, XmlDocument, XmlElement, XmlNode};

use crate::cell::{display_text, string_value, CellKind, CellWriter};
use crate::error::{XlsxError, XlsxResult};
use crate::ns::{
    element_prefix, relationship_id, CT_SHARED_STRINGS, REL_CALC_CHAIN_SUFFIX, REL_SHARED_STRINGS,
    REL_SHARED_STRINGS_SUFFIX, REL_WORKSHEET_SUFFIX,
};
use crate::shared_strings::SharedStrings;
use crate::worksheet::Worksheet;

/// Elements that precede `<calcPr>` in a workbook part
const BEFORE_CALC_PR: &[&str] = &[
    "fileVersion",
    "fileSharing",
    "workbookPr",
    "workbookProtection",
    "bookViews",
    "sheets",
    "functionGroups",
    "externalReferences",
    "definedNames",
];

/// An XLSX template opened for editing.
///
/// Only worksheets, the shared string table and the workbook part are
/// parsed; every other part is carried through unchanged.
#[derive(Debug, Clone)]
pub struct WorkbookTemplate {
    package: Package,
    workbook_part: String,
    workbook: XmlDocument,
    workbook_dirty: bool,
    prefix: String,
    sheets: Vec<Worksheet>,
    shared_strings: SharedStrings,
    date1904: bool,
    formulas_cleared: bool,
}

impl WorkbookTemplate {
    /// Open a template from its bytes
    pub fn open(bytes: &[u8]) -> XlsxResult<Self> {
        Self::from_package(Package::from_bytes(bytes)?)
    }

    /// Open a template from a file
    pub fn open_file<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::from_package(Package::read_file(path)?)
    }

    /// Wrap an already loaded package
    pub fn from_package(package: Package) -> XlsxResult<Self> {
        let workbook_part = match package.main_document_part() {
            Ok(part) => part,
            Err(_) if package.has_part("xl/workbook.xml") => "xl/workbook.xml".to_string(),
            Err(e) => return Err(e.into()),
        };
        let workbook = package.xml_part(&workbook_part)?;
        let prefix = element_prefix(&workbook.root);

        let date1904 = workbook
            .root
            .child(&format!("{}workbookPr", prefix))
            .and_then(|pr| pr.attr("date1904"))
            .map_or(false, |v| v == "1" || v.eq_ignore_ascii_case("true"));

        let rels = package.relationships(&workbook_part)?;

        let mut sheets = Vec::new();
        if let Some(list) = workbook.root.child(&format!("{}sheets", prefix)) {
            for entry in list.elements_named(&format!("{}sheet", prefix)) {
                let name = entry.attr("name").unwrap_or_default();
                let rel = relationship_id(entry).and_then(|id| rels.get(id));
                let rel = match rel {
                    Some(rel) if rel.rel_type.ends_with(REL_WORKSHEET_SUFFIX) => rel,
                    _ => {
                        tracing::debug!(sheet = name, "skipping non-worksheet sheet");
                        continue;
                    }
                };
                let part = rels.resolve(rel).ok_or_else(|| {
                    XlsxError::InvalidFormat(format!("sheet '{}' points outside the package", name))
                })?;
                let data = package
                    .part(&part)
                    .ok_or_else(|| stencil_opc::OpcError::MissingPart(part.clone()))?;
                sheets.push(Worksheet::parse(name, part.as_str(), data)?);
            }
        }

        let shared_strings = match rels
            .iter()
            .find(|r| r.rel_type.ends_with(REL_SHARED_STRINGS_SUFFIX))
            .and_then(|r| rels.resolve(r))
        {
            Some(part) => match package.part(&part) {
                Some(data) => SharedStrings::parse(part.as_str(), data)?,
                None => SharedStrings::empty(part),
            },
            None => SharedStrings::empty(sibling_part(&workbook_part, "sharedStrings.xml")),
        };

        tracing::debug!(
            workbook = %workbook_part,
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            "opened workbook template"
        );

        Ok(Self {
            package,
            workbook_part,
            workbook,
            workbook_dirty: false,
            prefix,
            sheets,
            shared_strings,
            date1904,
            formulas_cleared: false,
        })
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Worksheet::name)
    }

    /// Index of a worksheet by name, ignoring case
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| s.name() == name)
            .or_else(|| {
                let folded = name.to_lowercase();
                self.sheets
                    .iter()
                    .position(|s| s.name().to_lowercase() == folded)
            })
    }

    /// Worksheet by index
    pub fn sheet(&self, index: usize) -> XlsxResult<&Worksheet> {
        self.sheets.get(index).ok_or(XlsxError::SheetIndex(index))
    }

    fn sheet_mut(&mut self, index: usize) -> XlsxResult<&mut Worksheet> {
        self.sheets.get_mut(index).ok_or(XlsxError::SheetIndex(index))
    }

    /// Whether the workbook uses the 1904 date system
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }

    /// The shared string table
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Display text of a cell (`None` if the cell does not exist)
    pub fn cell_text(&self, sheet: usize, addr: CellAddress) -> XlsxResult<Option<String>> {
        let ws = self.sheet(sheet)?;
        Ok(ws
            .cell(addr)
            .map(|c| display_text(c, ws.prefix(), &self.shared_strings)))
    }

    /// Make sure a row exists
    pub fn ensure_row(&mut self, sheet: usize, row: u32) -> XlsxResult<()> {
        self.sheet_mut(sheet)?.row_mut_or_create(row)?;
        Ok(())
    }

    /// Copy row height and cell styles, see [`Worksheet::copy_row_style`]
    pub fn copy_row_style(&mut self, sheet: usize, src: u32, dst: u32, columns: u16) -> XlsxResult<()> {
        self.sheet_mut(sheet)?.copy_row_style(src, dst, columns)
    }

    /// A writer for the cell at `addr`, creating the cell if needed
    pub fn cell_writer(&mut self, sheet: usize, addr: CellAddress) -> XlsxResult<CellWriter<'_>> {
        let ws = self.sheets.get_mut(sheet).ok_or(XlsxError::SheetIndex(sheet))?;
        let (prefix, cell) = ws.prefix_and_cell_mut(addr)?;
        Ok(CellWriter {
            cell,
            prefix,
            strings: &mut self.shared_strings,
            date1904: self.date1904,
            formulas_cleared: &mut self.formulas_cleared,
        })
    }

    /// Offer the text of every string cell of every worksheet to `rewrite`.
    ///
    /// When `rewrite` returns a new text, the cell is rewritten as a shared
    /// string. Returns the number of cells changed.
    pub fn rewrite_text_cells<F>(&mut self, mut rewrite: F) -> XlsxResult<usize>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let strings = &mut self.shared_strings;
        let date1904 = self.date1904;
        let formulas_cleared = &mut self.formulas_cleared;
        let mut changed = 0;

        for ws in &mut self.sheets {
            let prefix = ws.prefix().to_string();
            let sheet_name = ws.name().to_string();
            ws.for_each_cell_mut(|addr, cell| {
                if !CellKind::of(cell).is_text() {
                    return Ok(false);
                }
                let text = match string_value(cell, &prefix, strings) {
                    Some(text) => text,
                    None => return Ok(false),
                };
                let replaced = match rewrite(&text) {
                    Some(replaced) if replaced != text => replaced,
                    _ => return Ok(false),
                };

                tracing::trace!(sheet = %sheet_name, cell = %addr, "rewrote text cell");
                let mut writer = CellWriter {
                    cell,
                    prefix: &prefix,
                    strings: &mut *strings,
                    date1904,
                    formulas_cleared: &mut *formulas_cleared,
                };
                stencil_core::CellSink::set_text(&mut writer, &replaced);
                changed += 1;
                Ok(true)
            })?;
        }
        Ok(changed)
    }

    /// Ask the spreadsheet application to recalculate every formula on open
    /// (`<calcPr fullCalcOnLoad="1"/>`).
    pub fn set_force_formula_recalculation(&mut self) {
        let calc_pr = format!("{}calcPr", self.prefix);
        let root = &mut self.workbook.root;

        if let Some(existing) = root.child_mut(&calc_pr) {
            existing.set_attr("fullCalcOnLoad", "1");
        } else {
            let before: Vec<String> = BEFORE_CALC_PR
                .iter()
                .map(|local| format!("{}{}", self.prefix, local))
                .collect();
            let at = root
                .children
                .iter()
                .rposition(|node| matches!(node, XmlNode::Element(e) if before.contains(&e.name)))
                .map_or(0, |i| i + 1);
            root.insert_child(at, XmlElement::new(calc_pr).with_attr("fullCalcOnLoad", "1"));
        }
        self.workbook_dirty = true;
    }

    /// Whether recalculation on open is requested
    pub fn force_formula_recalculation(&self) -> bool {
        self.workbook
            .root
            .child(&format!("{}calcPr", self.prefix))
            .and_then(|c| c.attr("fullCalcOnLoad"))
            .map_or(false, |v| v == "1" || v.eq_ignore_ascii_case("true"))
    }

    /// Write every modified part back into the package
    fn flush(&mut self) -> XlsxResult<()> {
        for ws in &mut self.sheets {
            if ws.is_dirty() {
                let part = ws.part_name().to_string();
                let bytes = ws.to_bytes();
                self.package.set_part(&part, bytes);
            }
        }

        if self.shared_strings.is_dirty() {
            let part = self.shared_strings.part_name().to_string();
            self.package.set_part(&part, self.shared_strings.to_bytes());
            if !self.shared_strings.existed() {
                let mut rels = self.package.relationships(&self.workbook_part)?;
                rels.add(REL_SHARED_STRINGS, relative_target(&self.workbook_part, &part));
                self.package.set_relationships(&rels);
                self.package.ensure_override(&part, CT_SHARED_STRINGS)?;
            }
        }

        if self.formulas_cleared {
            self.drop_calc_chain()?;
        }

        if self.workbook_dirty {
            self.package.set_xml_part(&self.workbook_part, &self.workbook);
        }
        Ok(())
    }

    /// The calculation chain lists formula cells; once a formula is
    /// overwritten it is stale and must go.
    fn drop_calc_chain(&mut self) -> XlsxResult<()> {
        let mut rels = self.package.relationships(&self.workbook_part)?;
        let chain = rels
            .iter()
            .find(|r| r.rel_type.ends_with(REL_CALC_CHAIN_SUFFIX))
            .map(|r| (r.id.clone(), rels.resolve(r)));

        if let Some((id, part)) = chain {
            rels.remove(&id);
            self.package.set_relationships(&rels);
            if let Some(part) = part {
                self.package.remove_part(&part);
                self.package.remove_override(&part)?;
            }
            tracing::debug!("removed stale calculation chain");
        }
        Ok(())
    }

    /// Serialize the edited template
    pub fn to_bytes(&mut self) -> XlsxResult<Vec<u8>> {
        self.flush()?;
        Ok(self.package.to_bytes()?)
    }

    /// Save the edited template to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> XlsxResult<()> {
        self.flush()?;
        Ok(self.package.save(path)?)
    }

    /// The underlying package (parts are current as of the last save)
    pub fn package(&self) -> &Package {
        &self.package
    }
}

/// Part name of `file` in the same folder as `part`
fn sibling_part(part: &str, file: &str) -> String {
    match part.rfind('/') {
        Some(pos) => format!("{}/{}", &part[..pos], file),
        None => file.to_string(),
    }
}

/// Relationship target of `target` as seen from `source` (same folder only)
fn relative_target(source: &str, target: &str) -> String {
    let folder = source.rfind('/').map_or("", |pos| &source[..=pos]);
    match target.strip_prefix(folder) {
        Some(relative) if !folder.is_empty() => relative.to_string(),
        _ => format!("/{}", target),
    }
}
