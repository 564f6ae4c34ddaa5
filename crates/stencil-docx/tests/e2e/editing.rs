//! Editing documents: paragraph rewriting, table growth and package upkeep.

use crate::{build_docx, para, row, table, HEADER};
use pretty_assertions::assert_eq;
use stencil_docx::{DocumentTemplate, DocxError, Emphasis, ParagraphRewrite, ParagraphScope};
use stencil_opc::Package;

fn reopen(doc: &mut DocumentTemplate) -> DocumentTemplate {
    let bytes = doc.to_bytes().expect("save should succeed");
    DocumentTemplate::open(&bytes).expect("saved document should reopen")
}

#[test]
fn test_rewrite_body_and_table_paragraphs() {
    let body = format!(
        "{}{}{}",
        para(&["Dear «Na", "me»,"]),
        para(&["No tokens here"]),
        table(&[row(&["Total", "«Price»"]), row(&["x", "y"])])
    );
    let mut doc = DocumentTemplate::open(&build_docx(&body)).unwrap();
    assert_eq!(doc.paragraph_count(), 2);
    assert_eq!(doc.table_count(), 1);

    let mut scopes = Vec::new();
    let changed = doc
        .rewrite_paragraphs(ParagraphRewrite::Uniform, &Emphasis::default(), |scope, text| {
            scopes.push(scope);
            Some(text.replace("«Name»", "Alice").replace("«Price»", "9.99"))
        })
        .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(scopes.len(), 6);
    assert_eq!(scopes[0], ParagraphScope::Body);
    assert_eq!(scopes[2], ParagraphScope::TableCell { table: 0, table_rows: 2 });

    let doc = reopen(&mut doc);
    assert_eq!(doc.paragraph_texts(), vec!["Dear Alice,", "No tokens here"]);
    assert_eq!(doc.cell_text(0, 0, 1).unwrap(), "9.99");

    let xml = String::from_utf8(doc.package().part("word/document.xml").unwrap().to_vec()).unwrap();
    assert!(xml.contains(r#"<w:rPr><w:b/><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr>"#));
    // The unchanged paragraph keeps its original run
    assert!(xml.contains(r#"<w:p><w:r><w:t xml:space="preserve">No tokens here</w:t></w:r></w:p>"#));
}

#[test]
fn test_untouched_document_is_preserved() {
    let bytes = build_docx(&para(&["plain"]));
    let original = Package::from_bytes(&bytes).unwrap();

    let mut doc = DocumentTemplate::open(&bytes).unwrap();
    let changed = doc
        .rewrite_paragraphs(ParagraphRewrite::Uniform, &Emphasis::default(), |_, _| None)
        .unwrap();
    assert_eq!(changed, 0);

    let saved = Package::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(saved.part("word/document.xml"), original.part("word/document.xml"));
    assert_eq!(saved.part("word/header1.xml"), Some(HEADER.as_bytes()));
}

#[test]
fn test_append_rows_and_set_cells() {
    let body = table(&[row(&["«Name»", "«Qty»"])]);
    let mut doc = DocumentTemplate::open(&build_docx(&body)).unwrap();
    assert_eq!(
        doc.table_header(0).unwrap(),
        Some(vec!["«Name»".to_string(), "«Qty»".to_string()])
    );

    let r = doc.append_row(0, 3).unwrap();
    assert_eq!(r, 1);
    doc.set_cell_text(0, r, 0, "Widget").unwrap();
    doc.set_cell_text(0, r, 2, "extra").unwrap();

    let doc = reopen(&mut doc);
    assert_eq!(doc.table_row_count(0).unwrap(), 2);
    assert_eq!(doc.cell_text(0, 1, 0).unwrap(), "Widget");
    assert_eq!(doc.cell_text(0, 1, 1).unwrap(), "");
    assert_eq!(doc.cell_text(0, 1, 2).unwrap(), "extra");
    assert_eq!(doc.cell_text(0, 0, 0).unwrap(), "«Name»");
}

#[test]
fn test_out_of_range_table_and_cell() {
    let mut doc = DocumentTemplate::open(&build_docx(&table(&[row(&["a"])]))).unwrap();
    assert!(matches!(doc.table_header(1), Err(DocxError::TableIndex(1))));
    assert!(matches!(
        doc.set_cell_text(0, 4, 0, "x"),
        Err(DocxError::CellIndex { table: 0, row: 4, col: 0 })
    ));
}

#[test]
fn test_empty_table_has_no_header() {
    let mut doc = DocumentTemplate::open(&build_docx("<w:tbl><w:tblPr/></w:tbl>")).unwrap();
    assert_eq!(doc.table_row_count(0).unwrap(), 0);
    assert_eq!(doc.table_header(0).unwrap(), None);
    assert_eq!(doc.append_row(0, 2).unwrap(), 0);
    assert_eq!(doc.cell_text(0, 0, 1).unwrap(), "");
}
