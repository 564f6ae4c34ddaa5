//! Common utilities for E2E tests.

use stencil_opc::{Package, CONTENT_TYPES_PART};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Header part carried through every test unchanged
pub const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>«Name»</w:t></w:r></w:p></w:hdr>"#;

/// Build a DOCX package whose body holds `body` (paragraphs and tables)
pub fn build_docx(body: &str) -> Vec<u8> {
    let mut package = Package::new();
    package.set_part(CONTENT_TYPES_PART, CONTENT_TYPES.as_bytes().to_vec());
    package.set_part("_rels/.rels", ROOT_RELS.as_bytes().to_vec());
    package.set_part(
        "word/document.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
        .into_bytes(),
    );
    package.set_part("word/header1.xml", HEADER.as_bytes().to_vec());
    package.to_bytes().expect("package should serialize")
}

/// A paragraph with one run per text piece
pub fn para(pieces: &[&str]) -> String {
    let runs: String = pieces
        .iter()
        .map(|t| format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, t))
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// A table row with one single-paragraph cell per text
pub fn row(cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|t| format!("<w:tc>{}</w:tc>", para(&[t])))
        .collect();
    format!("<w:tr>{}</w:tr>", cells)
}

/// A table with the given rows
pub fn table(rows: &[String]) -> String {
    format!("<w:tbl><w:tblPr/>{}</w:tbl>", rows.concat())
}
