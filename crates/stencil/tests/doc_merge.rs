//! End-to-end document merges through the `Stencil` facade.

mod common;

use common::{build_docx, para, table, THEME};
use pretty_assertions::assert_eq;
use stencil::{
    BatchFillOptions, CsvReader, DocumentMergeEngine, HeaderMatch, MemoryAssets, MergeError, MergeOptions,
    OptionSource, OutputDir, Stencil, TableAppendOptions,
};
use stencil_docx::DocumentTemplate;
use stencil_opc::Package;
use tempfile::tempdir;

fn batch_options(source: OptionSource) -> BatchFillOptions {
    BatchFillOptions {
        option_source: source,
        option_column: 2,
        options_table_rows: 2,
        file_name_fields: vec![0, 1],
        ..Default::default()
    }
}

fn batch_template() -> Vec<u8> {
    let body = format!(
        "{}{}{}",
        para("Dear «Name»,"),
        table(&[&["«Options1»"], &["«Options2»"]]),
        table(&[&["«Name»"]])
    );
    build_docx(&body)
}

const BATCH_CSV: &str = "Id,Name,Options\n7,Alice,red|green\n8,Bob,blue\n";

#[test]
fn test_batch_writes_one_document_per_row() {
    let assets = MemoryAssets::new()
        .with("Template.docx", batch_template())
        .with("Data.csv", BATCH_CSV);
    let dir = tempdir().unwrap();
    let stencil = Stencil::new(assets, OutputDir::new(dir.path()));

    let last = stencil
        .fill_document_placeholders_from_csv_batch(
            "Template.docx",
            "Data.csv",
            &batch_options(OptionSource::FirstRow),
        )
        .unwrap();
    assert_eq!(last, dir.path().join("8_Bob.docx"));

    let alice = DocumentTemplate::open_file(dir.path().join("7_Alice.docx")).unwrap();
    assert_eq!(alice.paragraph_texts(), vec!["Dear Alice,"]);
    assert_eq!(alice.cell_text(1, 0, 0).unwrap(), "Alice");

    // Option tables of every output come from the first row
    let bob = DocumentTemplate::open_file(&last).unwrap();
    assert_eq!(bob.paragraph_texts(), vec!["Dear Bob,"]);
    assert_eq!(bob.cell_text(0, 0, 0).unwrap(), "red");
    assert_eq!(bob.cell_text(0, 1, 0).unwrap(), "green");
    assert_eq!(bob.cell_text(1, 0, 0).unwrap(), "Bob");

    let package = Package::read_file(&last).unwrap();
    assert_eq!(package.part("word/theme/theme1.xml"), Some(THEME.as_bytes()));
}

#[test]
fn test_batch_file_names_stay_in_output_dir() {
    let assets = MemoryAssets::new()
        .with("Template.docx", batch_template())
        .with("Data.csv", "Id,Name,Options\n1,../../escaped,red\n2,/abs/path,blue\n");
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let stencil = Stencil::new(assets, OutputDir::new(&out));

    let options = BatchFillOptions {
        file_name_fields: vec![1],
        ..batch_options(OptionSource::CurrentRow)
    };
    let last = stencil
        .fill_document_placeholders_from_csv_batch("Template.docx", "Data.csv", &options)
        .unwrap();
    assert_eq!(last, out.join("_abs_path.docx"));
    assert!(out.join(".._.._escaped.docx").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn test_batch_options_from_current_row() {
    let engine = DocumentMergeEngine::new(MemoryAssets::new(), OutputDir::new("unused"));
    let data = CsvReader::default().parse(BATCH_CSV);

    let (name, bytes) = engine
        .render_row(&batch_template(), &data, 1, &batch_options(OptionSource::CurrentRow))
        .unwrap();
    assert_eq!(name, "8_Bob.docx");

    let doc = DocumentTemplate::open(&bytes).unwrap();
    assert_eq!(doc.cell_text(0, 0, 0).unwrap(), "blue");
    assert_eq!(doc.cell_text(0, 1, 0).unwrap(), "");
}

#[test]
fn test_batch_default_file_name_and_emphasis() {
    let template = build_docx(&format!("{}{}", para("«Price»"), para("for «Price»")));
    let assets = MemoryAssets::new()
        .with("Template.docx", template)
        .with("Data.csv", "A,B,C,D,E,F,G,H,I,J,Price\n0,Acme,Order,3,2024,5,6,7,8,Final,9.99\n");
    let dir = tempdir().unwrap();
    let stencil = Stencil::new(assets, OutputDir::new(dir.path()));

    let path = stencil
        .fill_document_placeholders_from_csv_batch("Template.docx", "Data.csv", &BatchFillOptions::default())
        .unwrap();
    assert_eq!(path, dir.path().join("Acme_Order_2024_Final.docx"));

    let doc = DocumentTemplate::open_file(&path).unwrap();
    assert_eq!(doc.paragraph_texts(), vec!["9.99", "for 9.99"]);

    let package = Package::read_file(&path).unwrap();
    let xml = String::from_utf8(package.part("word/document.xml").unwrap().to_vec()).unwrap();
    assert_eq!(xml.matches(r#"<w:sz w:val="56"/>"#).count(), 1);
    assert_eq!(xml.matches("<w:b/>").count(), 2);
}

#[test]
fn test_batch_without_data_rows() {
    let assets = MemoryAssets::new()
        .with("Template.docx", batch_template())
        .with("Data.csv", "Id,Name,Options\n");
    let dir = tempdir().unwrap();
    let stencil = Stencil::new(assets, OutputDir::new(dir.path()));

    let err = stencil
        .fill_document_placeholders_from_csv_batch("Template.docx", "Data.csv", &BatchFillOptions::default())
        .unwrap_err();
    assert!(matches!(err, MergeError::EmptyDataset));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_append_to_table_matched_by_header() {
    let body = format!(
        "{}{}",
        table(&[&["Other"]]),
        table(&[&["«Name»", "«Age»", ""]])
    );
    let assets = MemoryAssets::new()
        .with("Template.docx", build_docx(&body))
        .with("Data.csv", "Name,Age\nAlice,30\nBob,\n");
    let dir = tempdir().unwrap();
    let stencil = Stencil::new(assets, OutputDir::new(dir.path()));

    let path = stencil
        .append_document_table_from_csv("Template.docx", "Data.csv", "Output_Table.docx", true)
        .unwrap();
    let doc = DocumentTemplate::open_file(&path).unwrap();

    assert_eq!(doc.table_row_count(0).unwrap(), 1);
    assert_eq!(doc.table_row_count(1).unwrap(), 3);
    assert_eq!(doc.cell_text(1, 1, 0).unwrap(), "Alice");
    assert_eq!(doc.cell_text(1, 1, 1).unwrap(), "30");
    assert_eq!(doc.cell_text(1, 1, 2).unwrap(), "");
    assert_eq!(doc.cell_text(1, 2, 0).unwrap(), "Bob");
    assert_eq!(doc.cell_text(1, 2, 1).unwrap(), "");
}

#[test]
fn test_exact_ordered_rejects_partial_overlap() {
    let template = build_docx(&table(&[&["«Name»", "«Age»"]]));
    let data = CsvReader::default().parse("Name,Id\nAlice,1\n");

    let any = DocumentMergeEngine::new(MemoryAssets::new(), OutputDir::new("unused"));
    assert!(any.append(&template, &data, true).is_ok());

    let options = MergeOptions {
        table_append: TableAppendOptions {
            header_match: HeaderMatch::ExactOrdered,
            ..Default::default()
        },
        ..Default::default()
    };
    let exact = DocumentMergeEngine::new(MemoryAssets::new(), OutputDir::new("unused")).with_options(&options);
    let err = exact.append(&template, &data, true).unwrap_err();
    assert!(matches!(err, MergeError::NoMatchingTable));
}

#[test]
fn test_append_to_first_table_without_matching() {
    let template = build_docx(&format!("{}{}", table(&[&["«Code»", "«Name»"]]), table(&[&["«Name»"]])));
    let engine = DocumentMergeEngine::new(MemoryAssets::new(), OutputDir::new("unused"));
    let data = CsvReader::default().parse("name\nAlice\n");

    let doc = DocumentTemplate::open(&engine.append(&template, &data, false).unwrap()).unwrap();
    assert_eq!(doc.table_row_count(0).unwrap(), 2);
    assert_eq!(doc.cell_text(0, 1, 0).unwrap(), "");
    assert_eq!(doc.cell_text(0, 1, 1).unwrap(), "Alice");
    assert_eq!(doc.table_row_count(1).unwrap(), 1);
}

#[test]
fn test_append_errors() {
    let engine = DocumentMergeEngine::new(MemoryAssets::new(), OutputDir::new("unused"));
    let data = CsvReader::default().parse("Name\nAlice\n");
    let no_tables = build_docx(&para("text"));

    let err = engine.append(&no_tables, &data, false).unwrap_err();
    assert!(matches!(err, MergeError::MissingTable));

    let err = engine.append(&no_tables, &data, true).unwrap_err();
    assert!(matches!(err, MergeError::NoMatchingTable));

    let empty_table = build_docx("<w:tbl><w:tblPr/></w:tbl>");
    let err = engine.append(&empty_table, &data, false).unwrap_err();
    assert!(matches!(err, MergeError::EmptyTable));

    let err = engine
        .append(&empty_table, &CsvReader::default().parse(""), false)
        .unwrap_err();
    assert!(matches!(err, MergeError::EmptyHeader));
}
