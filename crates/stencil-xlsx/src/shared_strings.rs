//! Shared string table (`xl/sharedStrings.xml`)

use std::collections::HashMap;

use stencil_opc::{XmlDocument, XmlElement};

use crate::error::XlsxResult;
use crate::ns::{element_prefix, SPREADSHEET_NS};

/// The workbook's shared string table.
///
/// Existing entries (including rich-text runs) are kept as they are; new
/// strings are appended as plain `<si><t>` items.
#[derive(Debug, Clone)]
pub struct SharedStrings {
    part: String,
    doc: XmlDocument,
    prefix: String,
    texts: Vec<String>,
    lookup: HashMap<String, usize>,
    existed: bool,
    dirty: bool,
}

impl SharedStrings {
    /// An empty table that will be created at `part` if anything is added
    pub fn empty(part: impl Into<String>) -> Self {
        let root = XmlElement::new("sst")
            .with_attr("xmlns", SPREADSHEET_NS)
            .with_attr("count", "0")
            .with_attr("uniqueCount", "0");
        Self {
            part: part.into(),
            doc: XmlDocument::new(root),
            prefix: String::new(),
            texts: Vec::new(),
            lookup: HashMap::new(),
            existed: false,
            dirty: false,
        }
    }

    /// Parse an existing table
    pub fn parse(part: impl Into<String>, bytes: &[u8]) -> XlsxResult<Self> {
        let part = part.into();
        let doc = XmlDocument::parse(&part, bytes)?;
        let prefix = element_prefix(&doc.root);

        let si = format!("{}si", prefix);
        let texts: Vec<String> = doc
            .root
            .elements_named(&si)
            .map(|item| rich_text(item, &prefix))
            .collect();

        let mut lookup = HashMap::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            lookup.entry(text.clone()).or_insert(i);
        }

        Ok(Self {
            part,
            doc,
            prefix,
            texts,
            lookup,
            existed: true,
            dirty: false,
        })
    }

    /// Part name of the table
    pub fn part_name(&self) -> &str {
        &self.part
    }

    /// Whether the part exists in the source package
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Whether strings were added since loading
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of unique entries
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Plain text of an entry
    pub fn get(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    /// Index of `text`, appending a new entry if it is not present yet
    pub fn intern(&mut self, text: &str) -> usize {
        self.dirty = true;
        self.bump_count();
        if let Some(&index) = self.lookup.get(text) {
            return index;
        }

        let index = self.texts.len();
        let t = XmlElement::new(format!("{}t", self.prefix))
            .with_attr("xml:space", "preserve")
            .with_text(encode_excel_escapes(text));
        self.doc
            .root
            .push_child(XmlElement::new(format!("{}si", self.prefix)).with_child(t));
        self.texts.push(text.to_string());
        self.lookup.insert(text.to_string(), index);
        self.doc
            .root
            .set_attr("uniqueCount", self.texts.len().to_string());
        index
    }

    fn bump_count(&mut self) {
        let count = self
            .doc
            .root
            .attr("count")
            .and_then(|c| c.parse::<u64>().ok())
            .unwrap_or(0);
        self.doc.root.set_attr("count", (count + 1).to_string());
    }

    /// Serialized part content
    pub fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

/// Plain text of a string item (`<si>` or `<is>`): its `<t>` plus the `<t>` of
/// every rich-text run. Phonetic runs are skipped.
pub(crate) fn rich_text(item: &XmlElement, prefix: &str) -> String {
    let t = format!("{}t", prefix);
    let r = format!("{}r", prefix);

    let mut out = String::new();
    for child in item.elements() {
        if child.name == t {
            out.push_str(&child.text());
        } else if child.name == r {
            for run_text in child.elements_named(&t) {
                out.push_str(&run_text.text());
            }
        }
    }
    decode_excel_escapes(&out)
}

/// Decode `_xHHHH_` escape sequences (`_x000D_` is CR, `_x005F_` an underscore).
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match decode_one(candidate) {
            Some(ch) => {
                result.push(ch);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

fn decode_one(candidate: &str) -> Option<char> {
    let bytes = candidate.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'_' {
        return None;
    }
    let hex = candidate.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Encode text so that [`decode_excel_escapes`] gives it back: control
/// characters other than tab/LF/CR become `_xHHHH_`, and a literal
/// `_xHHHH_` gets its underscore escaped.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, ch) in s.char_indices() {
        if ch == '_' && decode_one(&s[i..]).is_some() {
            result.push_str("_x005F_");
        } else if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            result.push_str(&format!("_x{:04X}_", ch as u32));
        } else {
            result.push(ch);
        }
    }
    result
}
