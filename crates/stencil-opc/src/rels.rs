//! Package relationships (`_rels/*.rels` parts)

use crate::error::OpcResult;
use crate::xml::{XmlDocument, XmlElement};

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A single relationship from a source part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id, e.g. `rId1`
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target reference as written (relative to the source part's folder)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// The relationships of one source part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    source: String,
    items: Vec<Relationship>,
}

impl Relationships {
    /// Empty relationship set for `source` (`""` for the package root)
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            items: Vec::new(),
        }
    }

    /// Name of the `.rels` part holding the relationships of `source`.
    ///
    /// `xl/workbook.xml` -> `xl/_rels/workbook.xml.rels`, `""` -> `_rels/.rels`
    pub fn rels_part_name(source: &str) -> String {
        match source.rfind('/') {
            Some(pos) => format!("{}/_rels/{}.rels", &source[..pos], &source[pos + 1..]),
            None => format!("_rels/{}.rels", source),
        }
    }

    /// Parse a `.rels` part
    pub fn parse(source: impl Into<String>, bytes: &[u8]) -> OpcResult<Self> {
        let source = source.into();
        let doc = XmlDocument::parse(&Self::rels_part_name(&source), bytes)?;

        let items = doc
            .root
            .elements()
            .filter(|e| e.local_name() == "Relationship")
            .filter_map(|e| {
                Some(Relationship {
                    id: e.attr("Id")?.to_string(),
                    rel_type: e.attr("Type")?.to_string(),
                    target: e.attr("Target")?.to_string(),
                    external: e
                        .attr("TargetMode")
                        .map_or(false, |mode| mode.eq_ignore_ascii_case("External")),
                })
            })
            .collect();

        Ok(Self { source, items })
    }

    /// The source part these relationships belong to
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All relationships in document order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Relationship by id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// First relationship with the given type
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Resolve a relationship's target to an absolute part name (no leading `/`).
    ///
    /// Returns `None` for external targets.
    pub fn resolve(&self, rel: &Relationship) -> Option<String> {
        if rel.external {
            return None;
        }
        if let Some(absolute) = rel.target.strip_prefix('/') {
            return Some(absolute.to_string());
        }

        let mut segments: Vec<&str> = match self.source.rfind('/') {
            Some(pos) => self.source[..pos].split('/').collect(),
            None => Vec::new(),
        };
        for segment in rel.target.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        Some(segments.join("/"))
    }

    /// Add an internal relationship and return its new id
    pub fn add(&mut self, rel_type: impl Into<String>, target: impl Into<String>) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.into(),
            target: target.into(),
            external: false,
        });
        id
    }

    /// Remove a relationship by id
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Serialize as a `.rels` part
    pub fn to_xml(&self) -> Vec<u8> {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS);
        for rel in &self.items {
            let mut e = XmlElement::new("Relationship")
                .with_attr("Id", rel.id.as_str())
                .with_attr("Type", rel.rel_type.as_str())
                .with_attr("Target", rel.target.as_str());
            if rel.external {
                e.set_attr("TargetMode", "External");
            }
            root.push_child(e);
        }
        XmlDocument::new(root).to_bytes()
    }
}
