//! Worksheet part editing
//!
//! Rows and cells live under `<sheetData>` and must stay sorted by their
//! `r` reference. On load, rows and cells missing an `r` attribute get one
//! from their position, so lookups can rely on it.

use stencil_core::{CellAddress, CellRange, MAX_COLS, MAX_ROWS};
use stencil_opc::{XmlDocument, XmlElement, XmlNode};

use crate::error::{XlsxError, XlsxResult};
use crate::ns::element_prefix;

/// One worksheet of a workbook template
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    part: String,
    doc: XmlDocument,
    prefix: String,
    dirty: bool,
}

impl Worksheet {
    /// Parse a worksheet part
    pub fn parse(name: impl Into<String>, part: impl Into<String>, bytes: &[u8]) -> XlsxResult<Self> {
        let part = part.into();
        let doc = XmlDocument::parse(&part, bytes)?;
        let prefix = element_prefix(&doc.root);

        let mut sheet = Self {
            name: name.into(),
            part,
            doc,
            prefix,
            dirty: false,
        };
        if sheet.sheet_data().is_none() {
            return Err(XlsxError::InvalidFormat(format!(
                "{}: worksheet has no sheetData",
                sheet.part
            )));
        }
        sheet.dirty = sheet.normalize_references();
        Ok(sheet)
    }

    /// Sheet name as shown on its tab
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Part name, e.g. `xl/worksheets/sheet1.xml`
    pub fn part_name(&self) -> &str {
        &self.part
    }

    /// Whether the sheet was modified since loading
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    fn tag(&self, local: &str) -> String {
        format!("{}{}", self.prefix, local)
    }

    fn sheet_data(&self) -> Option<&XmlElement> {
        self.doc.root.child(&self.tag("sheetData"))
    }

    fn sheet_data_mut(&mut self) -> Option<&mut XmlElement> {
        let name = self.tag("sheetData");
        self.doc.root.child_mut(&name)
    }

    /// Give every row and cell an explicit reference. Returns whether
    /// anything changed.
    fn normalize_references(&mut self) -> bool {
        let row_tag = self.tag("row");
        let cell_tag = self.tag("c");
        let mut changed = false;

        let data = match self.sheet_data_mut() {
            Some(data) => data,
            None => return false,
        };

        let mut next_row: u32 = 1;
        for row in data.elements_named_mut(&row_tag) {
            let row_num = match row.attr("r").and_then(|r| r.parse::<u32>().ok()) {
                Some(r) if r > 0 => r,
                _ => {
                    row.set_attr("r", next_row.to_string());
                    changed = true;
                    next_row
                }
            };
            next_row = row_num.saturating_add(1);

            let mut next_col: u16 = 0;
            for cell in row.elements_named_mut(&cell_tag) {
                let col = match cell.attr("r").and_then(|r| CellAddress::parse(r).ok()) {
                    Some(addr) => addr.col,
                    None => {
                        let addr = CellAddress::new(row_num.min(MAX_ROWS) - 1, next_col);
                        cell.set_attr("r", addr.to_a1_string());
                        changed = true;
                        next_col
                    }
                };
                next_col = col.saturating_add(1).min(MAX_COLS - 1);
            }
        }
        changed
    }

    fn row_number(row: &XmlElement) -> Option<u32> {
        row.attr("r").and_then(|r| r.parse::<u32>().ok())
    }

    fn cell_address(cell: &XmlElement) -> Option<CellAddress> {
        cell.attr("r").and_then(|r| CellAddress::parse(r).ok())
    }

    /// The `<row>` element for a 0-based row index
    pub fn row(&self, row: u32) -> Option<&XmlElement> {
        let row_tag = self.tag("row");
        let target = row.checked_add(1)?;
        let found = self
            .sheet_data()?
            .elements_named(&row_tag)
            .find(|r| Self::row_number(r) == Some(target));
        found
    }

    /// Check whether a row exists
    pub fn has_row(&self, row: u32) -> bool {
        self.row(row).is_some()
    }

    /// One past the last cell index of a row (0 when the row is missing or empty)
    pub fn last_cell_num(&self, row: u32) -> u16 {
        let cell_tag = self.tag("c");
        self.row(row)
            .and_then(|r| {
                r.elements_named(&cell_tag)
                    .filter_map(Self::cell_address)
                    .map(|a| a.col + 1)
                    .max()
            })
            .unwrap_or(0)
    }

    /// The `<c>` element at an address
    pub fn cell(&self, addr: CellAddress) -> Option<&XmlElement> {
        let cell_tag = self.tag("c");
        let found = self
            .row(addr.row)?
            .elements_named(&cell_tag)
            .find(|c| Self::cell_address(c).map(|a| a.col) == Some(addr.col));
        found
    }

    /// The `<row>` element for a row index, created in sorted position if missing
    pub(crate) fn row_mut_or_create(&mut self, row: u32) -> XlsxResult<&mut XmlElement> {
        if row >= MAX_ROWS {
            return Err(stencil_core::Error::RowOutOfBounds(row, MAX_ROWS - 1).into());
        }
        let row_tag = self.tag("row");
        let part = self.part.clone();
        self.dirty = true;

        let data = self
            .sheet_data_mut()
            .ok_or_else(|| XlsxError::InvalidFormat(format!("{}: worksheet has no sheetData", part)))?;

        let target = row + 1;
        let mut insert_at = data.children.len();
        let mut found = None;
        for (i, node) in data.children.iter().enumerate() {
            if let XmlNode::Element(e) = node {
                if e.name != row_tag {
                    continue;
                }
                match Self::row_number(e) {
                    Some(r) if r == target => {
                        found = Some(i);
                        break;
                    }
                    Some(r) if r > target => {
                        insert_at = i;
                        break;
                    }
                    _ => {}
                }
            }
        }

        let index = match found {
            Some(i) => i,
            None => {
                data.insert_child(
                    insert_at,
                    XmlElement::new(row_tag).with_attr("r", target.to_string()),
                );
                insert_at
            }
        };

        match &mut data.children[index] {
            XmlNode::Element(e) => Ok(e),
            _ => Err(XlsxError::InvalidFormat(format!("{}: row {} is not an element", part, target))),
        }
    }

    /// The `<c>` element at an address, created (with its row) if missing
    pub(crate) fn cell_mut_or_create(&mut self, addr: CellAddress) -> XlsxResult<&mut XmlElement> {
        let cell_tag = self.tag("c");
        let part = self.part.clone();
        let row = self.row_mut_or_create(addr.row)?;

        let mut insert_at = None;
        let mut found = None;
        let mut last_cell = None;
        for (i, node) in row.children.iter().enumerate() {
            if let XmlNode::Element(e) = node {
                if e.name != cell_tag {
                    continue;
                }
                last_cell = Some(i);
                match Self::cell_address(e).map(|a| a.col) {
                    Some(c) if c == addr.col => {
                        found = Some(i);
                        break;
                    }
                    Some(c) if c > addr.col => {
                        insert_at = Some(i);
                        break;
                    }
                    _ => {}
                }
            }
        }

        let index = match found {
            Some(i) => i,
            None => {
                // After the last cell, but before any trailing extLst
                let at = insert_at.unwrap_or_else(|| last_cell.map_or(0, |i| i + 1));
                // The span hint would no longer cover the row
                row.remove_attr("spans");
                row.insert_child(
                    at,
                    XmlElement::new(cell_tag).with_attr("r", addr.to_a1_string()),
                );
                at
            }
        };

        match &mut row.children[index] {
            XmlNode::Element(e) => Ok(e),
            _ => Err(XlsxError::InvalidFormat(format!(
                "{}: cell {} is not an element",
                part, addr
            ))),
        }
    }

    /// The element prefix together with the (created if missing) cell at `addr`
    pub(crate) fn prefix_and_cell_mut(
        &mut self,
        addr: CellAddress,
    ) -> XlsxResult<(&str, &mut XmlElement)> {
        self.cell_mut_or_create(addr)?;

        let Self {
            prefix, doc, part, ..
        } = self;
        let row_tag = format!("{}row", prefix);
        let cell_tag = format!("{}c", prefix);
        let cell = doc
            .root
            .child_mut(&format!("{}sheetData", prefix))
            .and_then(|data| {
                data.elements_named_mut(&row_tag)
                    .find(|r| Self::row_number(r) == Some(addr.row + 1))
            })
            .and_then(|row| {
                row.elements_named_mut(&cell_tag)
                    .find(|c| Self::cell_address(c).map(|a| a.col) == Some(addr.col))
            })
            .ok_or_else(|| XlsxError::InvalidFormat(format!("{}: cannot create cell {}", part, addr)))?;
        Ok((prefix.as_str(), cell))
    }

    /// Visit every `<c>` element mutably, with its address
    pub(crate) fn for_each_cell_mut<F>(&mut self, mut visit: F) -> XlsxResult<()>
    where
        F: FnMut(CellAddress, &mut XmlElement) -> XlsxResult<bool>,
    {
        let row_tag = self.tag("row");
        let cell_tag = self.tag("c");
        let mut changed = false;

        if let Some(data) = self.sheet_data_mut() {
            for row in data.elements_named_mut(&row_tag) {
                for cell in row.elements_named_mut(&cell_tag) {
                    if let Some(addr) = Self::cell_address(cell) {
                        changed |= visit(addr, cell)?;
                    }
                }
            }
        }
        self.dirty |= changed;
        Ok(())
    }

    /// Copy row height and per-cell style indices from `src` to `dst` for
    /// columns `0..columns`. Destination cells are created even where the
    /// source has no cell, and keep their own style in that case.
    pub fn copy_row_style(&mut self, src: u32, dst: u32, columns: u16) -> XlsxResult<()> {
        let cell_tag = self.tag("c");
        let (height, custom_height, styles) = match self.row(src) {
            Some(row) => {
                let styles: Vec<(u16, Option<String>)> = row
                    .elements_named(&cell_tag)
                    .filter_map(|c| Some((Self::cell_address(c)?.col, c.attr("s").map(str::to_string))))
                    .collect();
                (
                    row.attr("ht").map(str::to_string),
                    row.attr("customHeight").map(str::to_string),
                    styles,
                )
            }
            None => (None, None, Vec::new()),
        };

        let row = self.row_mut_or_create(dst)?;
        match height {
            Some(ht) => row.set_attr("ht", ht),
            None => {
                row.remove_attr("ht");
            }
        }
        match custom_height {
            Some(custom) => row.set_attr("customHeight", custom),
            None => {
                row.remove_attr("customHeight");
            }
        }

        for col in 0..columns {
            let cell = self.cell_mut_or_create(CellAddress::new(dst, col))?;
            let source = styles.iter().find(|(c, _)| *c == col);
            match source {
                Some((_, Some(style))) => cell.set_attr("s", style.as_str()),
                Some((_, None)) => {
                    cell.remove_attr("s");
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Bounding range of all cells, if any
    pub fn used_range(&self) -> Option<CellRange> {
        let row_tag = self.tag("row");
        let cell_tag = self.tag("c");
        self.sheet_data()?
            .elements_named(&row_tag)
            .flat_map(|r| r.elements_named(&cell_tag))
            .filter_map(Self::cell_address)
            .fold(None, |range: Option<CellRange>, addr| match range {
                Some(range) => Some(range.expand_to(addr)),
                None => Some(CellRange::single(addr)),
            })
    }

    /// Serialize the sheet, refreshing its `<dimension>` first
    pub(crate) fn to_bytes(&mut self) -> Vec<u8> {
        let dimension = self.tag("dimension");
        if let Some(range) = self.used_range() {
            if let Some(dim) = self.doc.root.child_mut(&dimension) {
                dim.set_attr("ref", range.to_a1_string());
            }
        }
        self.doc.to_bytes()
    }
}
