//! Template builders shared by the merge tests.

#![allow(dead_code)]

use stencil_opc::{Package, CONTENT_TYPES_PART};

const XLSX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const DOCX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

fn root_rels(target: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="{}"/></Relationships>"#,
        target
    )
    .into_bytes()
}

/// Theme part carried through every merge unchanged
pub const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office"/>"#;

/// Build an XLSX package. Each sheet is `(name, sheetData content)`; cells
/// may refer to `strings` by index with `t="s"`.
pub fn build_xlsx(sheets: &[(&str, &str)], strings: &[&str]) -> Vec<u8> {
    let mut package = Package::new();
    package.set_part(CONTENT_TYPES_PART, XLSX_CONTENT_TYPES.as_bytes().to_vec());
    package.set_part("_rels/.rels", root_rels("xl/workbook.xml"));

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, name, n, n));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
        package.set_part(
            &format!("xl/worksheets/sheet{}.xml", n),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1"/><sheetData>{}</sheetData></worksheet>"#,
                rows
            )
            .into_bytes(),
        );
    }
    workbook.push_str("</sheets></workbook>");

    let items: String = strings.iter().map(|s| format!("<si><t>{}</t></si>", s)).collect();
    package.set_part(
        "xl/sharedStrings.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
            strings.len(),
            items
        )
        .into_bytes(),
    );
    rels.push_str(r#"<Relationship Id="rId100" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#);
    rels.push_str(r#"<Relationship Id="rId101" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>"#);
    rels.push_str("</Relationships>");

    package.set_part("xl/theme/theme1.xml", THEME.as_bytes().to_vec());
    package.set_part("xl/workbook.xml", workbook.into_bytes());
    package.set_part("xl/_rels/workbook.xml.rels", rels.into_bytes());
    package.to_bytes().expect("package should serialize")
}

/// Build a DOCX package whose body holds `body`
pub fn build_docx(body: &str) -> Vec<u8> {
    let mut package = Package::new();
    package.set_part(CONTENT_TYPES_PART, DOCX_CONTENT_TYPES.as_bytes().to_vec());
    package.set_part("_rels/.rels", root_rels("word/document.xml"));
    package.set_part(
        "word/document.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
        .into_bytes(),
    );
    package.set_part("word/theme/theme1.xml", THEME.as_bytes().to_vec());
    package.to_bytes().expect("package should serialize")
}

/// A paragraph with a single run
pub fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// A table; each row is a list of single-paragraph cell texts
pub fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells.iter().map(|t| format!("<w:tc>{}</w:tc>", para(t))).collect();
            format!("<w:tr>{}</w:tr>", cells)
        })
        .collect();
    format!("<w:tbl><w:tblPr/>{}</w:tbl>", rows)
}
