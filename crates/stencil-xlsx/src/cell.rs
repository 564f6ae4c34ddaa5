//! Cell values: reading display text and writing typed values

use chrono::NaiveDateTime;
use stencil_core::CellSink;
use stencil_opc::{XmlElement, XmlNode};

use crate::serial::date_time_to_serial;
use crate::shared_strings::{decode_excel_escapes, rich_text, SharedStrings};

/// Value type stored in a cell's `t` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Number (no `t`, or `t="n"`)
    Number,
    /// Shared string (`t="s"`)
    SharedString,
    /// Inline rich string (`t="inlineStr"`)
    InlineString,
    /// Formula string result (`t="str"`)
    FormulaString,
    /// Boolean (`t="b"`)
    Boolean,
    /// Error (`t="e"`)
    Error,
    /// ISO 8601 date (`t="d"`)
    Date,
}

impl CellKind {
    /// Kind of a `<c>` element
    pub fn of(cell: &XmlElement) -> Self {
        match cell.attr("t") {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            Some("str") => CellKind::FormulaString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            Some("d") => CellKind::Date,
            _ => CellKind::Number,
        }
    }

    /// Whether the cell holds literal (non-formula) text
    pub fn is_text(self) -> bool {
        matches!(self, CellKind::SharedString | CellKind::InlineString)
    }
}

fn raw_value(cell: &XmlElement, prefix: &str) -> Option<String> {
    cell.child(&format!("{}v", prefix)).map(|v| v.text())
}

/// Text of a string cell, `None` for any other kind
pub(crate) fn string_value(cell: &XmlElement, prefix: &str, strings: &SharedStrings) -> Option<String> {
    match CellKind::of(cell) {
        CellKind::SharedString => {
            let index = raw_value(cell, prefix)?.trim().parse::<usize>().ok()?;
            match strings.get(index) {
                Some(text) => Some(text.to_string()),
                None => {
                    tracing::warn!(index, cell = ?cell.attr("r"), "shared string index out of range");
                    None
                }
            }
        }
        CellKind::InlineString => cell
            .child(&format!("{}is", prefix))
            .map(|is| rich_text(is, prefix)),
        _ => None,
    }
}

/// Display text of a cell: strings as stored, numbers in shortest form,
/// booleans as `TRUE`/`FALSE`, errors and dates as written.
pub(crate) fn display_text(cell: &XmlElement, prefix: &str, strings: &SharedStrings) -> String {
    let kind = CellKind::of(cell);
    if kind.is_text() {
        return string_value(cell, prefix, strings).unwrap_or_default();
    }

    let raw = raw_value(cell, prefix).unwrap_or_default();
    match kind {
        CellKind::Boolean => match raw.trim() {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            other => other.to_string(),
        },
        CellKind::Number => match raw.trim().parse::<f64>() {
            Ok(n) => format_number(n),
            Err(_) => raw,
        },
        CellKind::FormulaString => decode_excel_escapes(&raw),
        _ => raw,
    }
}

/// Format a number the way it is written to `<v>` (shortest round-trip form)
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Writes typed values into one `<c>` element.
///
/// Setting a value drops any formula, inline string or old value the cell
/// carried; the cell's style index is left alone.
pub struct CellWriter<'a> {
    pub(crate) cell: &'a mut XmlElement,
    pub(crate) prefix: &'a str,
    pub(crate) strings: &'a mut SharedStrings,
    pub(crate) date1904: bool,
    pub(crate) formulas_cleared: &'a mut bool,
}

impl CellWriter<'_> {
    fn write(&mut self, kind: Option<&str>, value: String) {
        let f = format!("{}f", self.prefix);
        let v = format!("{}v", self.prefix);
        let is = format!("{}is", self.prefix);

        if self.cell.child(&f).is_some() {
            *self.formulas_cleared = true;
        }
        self.cell.retain_children(|node| match node {
            XmlNode::Element(e) => e.name != f && e.name != v && e.name != is,
            _ => false,
        });

        match kind {
            Some(t) => self.cell.set_attr("t", t),
            None => {
                self.cell.remove_attr("t");
            }
        }
        // <v> comes before any extLst
        self.cell.insert_child(0, XmlElement::new(v).with_text(value));
    }
}

impl CellSink for CellWriter<'_> {
    fn set_number(&mut self, value: f64) {
        self.write(None, format_number(value));
    }

    fn set_date_time(&mut self, value: NaiveDateTime) {
        let serial = date_time_to_serial(value, self.date1904);
        self.write(None, format_number(serial));
    }

    fn set_bool(&mut self, value: bool) {
        self.write(Some("b"), if value { "1" } else { "0" }.to_string());
    }

    fn set_text(&mut self, value: &str) {
        let index = self.strings.intern(value);
        self.write(Some("s"), index.to_string());
    }
}
