//! Zip-backed Open Packaging Conventions container
//!
//! Every entry of the source archive is kept, in order. Parts that are never
//! replaced are written back with their original bytes, so a template keeps
//! everything a merge does not touch (styles, drawings, custom XML, ...).

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::error::{OpcError, OpcResult};
use crate::rels::Relationships;
use crate::xml::{XmlDocument, XmlElement, XmlNode};
use crate::REL_OFFICE_DOCUMENT;

/// Name of the content types part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

#[derive(Debug, Clone)]
struct PartEntry {
    name: String,
    data: Vec<u8>,
    stored: bool,
}

/// An in-memory package
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<PartEntry>,
}

impl Package {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from a seekable reader
    pub fn read<R: Read + Seek>(reader: R) -> OpcResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(PartEntry {
                name: file.name().to_string(),
                data,
                stored: file.compression() == CompressionMethod::Stored,
            });
        }

        let package = Self { parts };
        if !package.has_part(CONTENT_TYPES_PART) {
            return Err(OpcError::MissingPart(CONTENT_TYPES_PART.to_string()));
        }
        tracing::debug!(parts = package.parts.len(), "read package");
        Ok(package)
    }

    /// Read a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> OpcResult<Self> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a package from a file
    pub fn read_file<P: AsRef<Path>>(path: P) -> OpcResult<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Part names in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Check if a part exists
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Raw bytes of a part
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Replace a part's bytes, or append a new part
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(PartEntry {
                name: name.to_string(),
                data,
                stored: false,
            }),
        }
    }

    /// Remove a part, returning its bytes
    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        let pos = self.parts.iter().position(|p| p.name == name)?;
        Some(self.parts.remove(pos).data)
    }

    /// Parse a part as XML
    pub fn xml_part(&self, name: &str) -> OpcResult<XmlDocument> {
        let data = self
            .part(name)
            .ok_or_else(|| OpcError::MissingPart(name.to_string()))?;
        XmlDocument::parse(name, data)
    }

    /// Serialize an XML document into a part
    pub fn set_xml_part(&mut self, name: &str, doc: &XmlDocument) {
        self.set_part(name, doc.to_bytes());
    }

    /// Relationships of a source part (`""` for the package root).
    ///
    /// A missing `.rels` part yields an empty set.
    pub fn relationships(&self, source: &str) -> OpcResult<Relationships> {
        match self.part(&Relationships::rels_part_name(source)) {
            Some(data) => Relationships::parse(source, data),
            None => Ok(Relationships::new(source)),
        }
    }

    /// Store a relationship set in its `.rels` part
    pub fn set_relationships(&mut self, rels: &Relationships) {
        let name = Relationships::rels_part_name(rels.source());
        self.set_part(&name, rels.to_xml());
    }

    /// The main document part (`xl/workbook.xml`, `word/document.xml`, ...)
    pub fn main_document_part(&self) -> OpcResult<String> {
        let rels = self.relationships("")?;
        rels.by_type(REL_OFFICE_DOCUMENT)
            .and_then(|rel| rels.resolve(rel))
            .ok_or_else(|| {
                OpcError::InvalidFormat("package has no officeDocument relationship".into())
            })
    }

    /// Make sure `[Content_Types].xml` declares `content_type` for `part_name`.
    ///
    /// Nothing changes when the part is already covered by an override.
    pub fn ensure_override(&mut self, part_name: &str, content_type: &str) -> OpcResult<()> {
        let mut doc = self.xml_part(CONTENT_TYPES_PART)?;
        let absolute = format!("/{}", part_name.trim_start_matches('/'));

        let present = doc
            .root
            .elements()
            .any(|e| e.local_name() == "Override" && e.attr("PartName") == Some(absolute.as_str()));
        if present {
            return Ok(());
        }

        // Reuse the root's prefix, if it has one
        let name = match doc.root.name.split_once(':') {
            Some((prefix, _)) => format!("{}:Override", prefix),
            None => "Override".to_string(),
        };
        doc.root.push_child(
            XmlElement::new(name)
                .with_attr("PartName", absolute)
                .with_attr("ContentType", content_type),
        );
        self.set_xml_part(CONTENT_TYPES_PART, &doc);
        Ok(())
    }

    /// Drop the content-type override of a part, if there is one
    pub fn remove_override(&mut self, part_name: &str) -> OpcResult<()> {
        let mut doc = self.xml_part(CONTENT_TYPES_PART)?;
        let absolute = format!("/{}", part_name.trim_start_matches('/'));

        let before = doc.root.children.len();
        doc.root.retain_children(|node| {
            !matches!(node, XmlNode::Element(e)
                if e.local_name() == "Override" && e.attr("PartName") == Some(absolute.as_str()))
        });
        if doc.root.children.len() != before {
            self.set_xml_part(CONTENT_TYPES_PART, &doc);
        }
        Ok(())
    }

    /// Write the package to a seekable writer
    pub fn write<W: Write + Seek>(&self, writer: W) -> OpcResult<W> {
        let mut zip = zip::ZipWriter::new(writer);

        for part in &self.parts {
            let method = if part.stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        tracing::debug!(parts = self.parts.len(), "wrote package");
        Ok(zip.finish()?)
    }

    /// Write the package to bytes
    pub fn to_bytes(&self) -> OpcResult<Vec<u8>> {
        Ok(self.write(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to a file, replacing it if it exists
    pub fn save<P: AsRef<Path>>(&self, path: P) -> OpcResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
