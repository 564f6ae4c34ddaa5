//! A small mutable XML element tree
//!
//! Parts that a merge edits (worksheets, shared strings, the document body)
//! are loaded into this tree, modified, and serialized back. Element and
//! attribute names are kept exactly as written, prefixes included, and text
//! is kept byte-for-byte apart from entity normalization.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{OpcError, OpcResult};

/// A node in the element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Child element
    Element(XmlElement),
    /// Character data (already unescaped)
    Text(String),
    /// `<![CDATA[...]]>` section
    CData(String),
    /// `<!--...-->` comment
    Comment(String),
    /// `<?...?>` processing instruction
    ProcessingInstruction(String),
}

/// An XML element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Qualified name, e.g. `w:p`
    pub name: String,
    /// Attributes in document order (unescaped values)
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push_child(child);
        self
    }

    /// Builder-style text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Attribute value by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set (or replace) an attribute, keeping its position when present
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Prefix bound to a namespace URI on this element.
    ///
    /// `Some("")` means the namespace is the default namespace.
    pub fn namespace_prefix(&self, uri: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(k, v)| {
            if v != uri {
                None
            } else if k == "xmlns" {
                Some("")
            } else {
                k.strip_prefix("xmlns:")
            }
        })
    }

    /// Child elements in order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Mutable child elements in order
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Child elements with the given qualified name
    pub fn elements_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'n
    where
        'a: 'n,
    {
        self.elements().filter(move |e| e.name == name)
    }

    /// Mutable child elements with the given qualified name
    pub fn elements_named_mut<'a, 'n>(
        &'a mut self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + 'n
    where
        'a: 'n,
    {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First mutable child element with the given name
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Node index of the first child element with the given name
    pub fn child_position(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.name == name))
    }

    /// Append a child element
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Insert a child element at a node index
    pub fn insert_child(&mut self, index: usize, child: XmlElement) {
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Keep only the child nodes for which `keep` returns true
    pub fn retain_children<F>(&mut self, keep: F)
    where
        F: FnMut(&XmlNode) -> bool,
    {
        self.children.retain(keep);
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Concatenated text of all descendant text and CDATA nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
                _ => {}
            }
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for node in &self.children {
            match node {
                XmlNode::Element(e) => e.write_to(out),
                XmlNode::Text(t) => escape_into(t, false, out),
                XmlNode::CData(t) => {
                    out.push_str("<![CDATA[");
                    out.push_str(t);
                    out.push_str("]]>");
                }
                XmlNode::Comment(t) => {
                    out.push_str("<!--");
                    out.push_str(t);
                    out.push_str("-->");
                }
                XmlNode::ProcessingInstruction(t) => {
                    out.push_str("<?");
                    out.push_str(t);
                    out.push_str("?>");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML part: optional declaration, prolog nodes and the root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Raw declaration content, e.g. `xml version="1.0" encoding="UTF-8"`
    pub declaration: Option<String>,
    /// Comments and processing instructions before the root element
    pub prolog: Vec<XmlNode>,
    /// The root element
    pub root: XmlElement,
}

impl XmlDocument {
    /// Create a document with the standard OOXML declaration
    pub fn new(root: XmlElement) -> Self {
        Self {
            declaration: Some(r#"xml version="1.0" encoding="UTF-8" standalone="yes""#.into()),
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a part's bytes. `part` names the part in error messages.
    pub fn parse(part: &str, bytes: &[u8]) -> OpcResult<Self> {
        let xml_err = |source: quick_xml::Error| OpcError::Xml {
            part: part.to_string(),
            source,
        };

        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(xml_err)?;
            let node = match event {
                Event::Decl(e) => {
                    declaration = Some(utf8(part, &*e)?);
                    None
                }
                Event::Start(e) | Event::Empty(e) if root.is_some() => {
                    return Err(OpcError::InvalidFormat(format!(
                        "{}: content after root element <{}>",
                        part,
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                Event::Start(e) => {
                    stack.push(start_element(&e, part)?);
                    None
                }
                Event::Empty(e) => Some(XmlNode::Element(start_element(&e, part)?)),
                Event::End(_) => stack.pop().map(XmlNode::Element),
                Event::Text(e) => Some(XmlNode::Text(e.unescape().map_err(xml_err)?.into_owned())),
                Event::CData(e) => Some(XmlNode::CData(utf8(part, &*e)?)),
                Event::Comment(e) => Some(XmlNode::Comment(utf8(part, &*e)?)),
                Event::PI(e) => Some(XmlNode::ProcessingInstruction(utf8(part, &*e)?)),
                Event::DocType(_) => None,
                Event::Eof => break,
            };

            if let Some(node) = node {
                match (stack.last_mut(), node) {
                    (Some(parent), node) => parent.children.push(node),
                    (None, XmlNode::Element(e)) => root = Some(e),
                    // Whitespace and comments outside the root element
                    (None, XmlNode::Text(_)) => {}
                    (None, node) => prolog.push(node),
                }
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OpcError::InvalidFormat(format!("{}: unclosed element", part)));
        }
        let root = root.ok_or_else(|| OpcError::InvalidFormat(format!("{}: no root element", part)))?;

        Ok(Self {
            declaration,
            prolog,
            root,
        })
    }

    /// Serialize to a string
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if let Some(decl) = &self.declaration {
            out.push_str("<?");
            out.push_str(decl);
            out.push_str("?>\r\n");
        }
        for node in &self.prolog {
            match node {
                XmlNode::Comment(t) => {
                    out.push_str("<!--");
                    out.push_str(t);
                    out.push_str("-->");
                }
                XmlNode::ProcessingInstruction(t) => {
                    out.push_str("<?");
                    out.push_str(t);
                    out.push_str("?>");
                }
                _ => {}
            }
        }
        self.root.write_to(&mut out);
        out
    }

    /// Serialize to UTF-8 bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml_string().into_bytes()
    }
}

fn utf8(part: &str, bytes: &[u8]) -> OpcResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| OpcError::Encoding(part.to_string()))
}

fn start_element(e: &quick_xml::events::BytesStart<'_>, part: &str) -> OpcResult<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|_| OpcError::Encoding(part.to_string()))?
        .to_string();

    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OpcError::Xml {
            part: part.to_string(),
            source: quick_xml::Error::InvalidAttr(err),
        })?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| OpcError::Encoding(part.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|source| OpcError::Xml {
                part: part.to_string(),
                source,
            })?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
}
