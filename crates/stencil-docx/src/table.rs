//! Table rows and cells (`w:tbl` / `w:tr` / `w:tc`)

use stencil_opc::XmlElement;

use crate::names::WordNames;
use crate::paragraph::paragraph_text;

/// Number of rows in a table
pub fn row_count(table: &XmlElement, names: &WordNames) -> usize {
    table.elements_named(&names.tr).count()
}

/// Number of cells in a row
pub fn cell_count(row: &XmlElement, names: &WordNames) -> usize {
    row.elements_named(&names.tc).count()
}

/// Text of the first paragraph of a cell, trimmed (`""` without paragraphs)
pub fn cell_first_paragraph_text(cell: &XmlElement, names: &WordNames) -> String {
    cell.child(&names.p)
        .map(|p| paragraph_text(p, names).trim().to_string())
        .unwrap_or_default()
}

/// Header names of a table: the first-paragraph text of each first-row cell.
///
/// `None` when the table has no rows.
pub fn header_texts(table: &XmlElement, names: &WordNames) -> Option<Vec<String>> {
    let first = table.child(&names.tr)?;
    Some(
        first
            .elements_named(&names.tc)
            .map(|cell| cell_first_paragraph_text(cell, names))
            .collect(),
    )
}

/// A new empty cell holding one empty paragraph
pub fn new_cell(names: &WordNames) -> XmlElement {
    XmlElement::new(names.tc.as_str()).with_child(XmlElement::new(names.p.as_str()))
}

/// Append a row with as many empty cells as the table's first row has.
/// Returns the new row's index.
pub fn create_row(table: &mut XmlElement, names: &WordNames) -> usize {
    let cells = table
        .child(&names.tr)
        .map_or(0, |first| cell_count(first, names));
    let index = row_count(table, names);

    let mut row = XmlElement::new(names.tr.as_str());
    for _ in 0..cells {
        row.push_child(new_cell(names));
    }
    table.push_child(row);
    index
}

/// Append one empty cell to a row
pub fn add_cell(row: &mut XmlElement, names: &WordNames) {
    row.push_child(new_cell(names));
}
