//! Editing templates: text rewriting, typed writes, row styles and package upkeep.

use crate::{build_xlsx, SheetSpec, STYLES};
use pretty_assertions::assert_eq;
use stencil_core::coerce::write_value;
use stencil_core::CellAddress;
use stencil_opc::{Package, CONTENT_TYPES_PART};
use stencil_xlsx::WorkbookTemplate;

fn reopen(wb: &mut WorkbookTemplate) -> WorkbookTemplate {
    let bytes = wb.to_bytes().expect("save should succeed");
    WorkbookTemplate::open(&bytes).expect("saved workbook should reopen")
}

fn text(wb: &WorkbookTemplate, sheet: usize, a1: &str) -> Option<String> {
    wb.cell_text(sheet, CellAddress::parse(a1).unwrap()).unwrap()
}

#[test]
fn test_rewrite_text_cells_across_sheets() {
    let bytes = build_xlsx(
        &[
            SheetSpec {
                name: "Invoice",
                rows: r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>7</v></c></row>"#,
            },
            SheetSpec {
                name: "Notes",
                rows: r#"<row r="3"><c r="C3" t="inlineStr"><is><t>Dear ${Name}</t></is></c></row>"#,
            },
        ],
        Some(&["Hello ${Name}"]),
        false,
    );

    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Invoice", "Notes"]);

    let changed = wb
        .rewrite_text_cells(|t| Some(t.replace("${Name}", "Alice")))
        .unwrap();
    assert_eq!(changed, 2);

    let wb = reopen(&mut wb);
    assert_eq!(text(&wb, 0, "A1").as_deref(), Some("Hello Alice"));
    assert_eq!(text(&wb, 0, "B1").as_deref(), Some("7"));
    assert_eq!(text(&wb, 1, "C3").as_deref(), Some("Dear Alice"));
    // The original entry is still in the table for any other reference
    assert_eq!(wb.shared_strings().get(0), Some("Hello ${Name}"));
}

#[test]
fn test_unchanged_cells_and_parts_are_preserved() {
    let bytes = build_xlsx(
        &[SheetSpec {
            name: "Sheet1",
            rows: r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#,
        }],
        Some(&["no tokens"]),
        false,
    );
    let original = Package::from_bytes(&bytes).unwrap();

    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    assert_eq!(wb.rewrite_text_cells(|_| None).unwrap(), 0);
    let saved = Package::from_bytes(&wb.to_bytes().unwrap()).unwrap();

    for part in ["xl/worksheets/sheet1.xml", "xl/sharedStrings.xml", "xl/workbook.xml"] {
        assert_eq!(saved.part(part), original.part(part), "{}", part);
    }
    assert_eq!(saved.part("xl/styles.xml"), Some(STYLES.as_bytes()));
}

#[test]
fn test_typed_writes_and_new_shared_string_table() {
    let bytes = build_xlsx(
        &[SheetSpec {
            name: "Data",
            rows: r#"<row r="1"><c r="A1"><v>1</v></c></row>"#,
        }],
        None,
        false,
    );

    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    for (col, raw) in ["12.5", "2024-01-15", "true", "Bob"].iter().enumerate() {
        let mut writer = wb.cell_writer(0, CellAddress::new(1, col as u16)).unwrap();
        write_value(&mut writer, raw);
    }

    let saved = wb.to_bytes().unwrap();
    let package = Package::from_bytes(&saved).unwrap();
    assert!(package.has_part("xl/sharedStrings.xml"));
    let rels = package.relationships("xl/workbook.xml").unwrap();
    assert!(rels.iter().any(|r| r.target == "sharedStrings.xml"));
    let types = String::from_utf8(package.part(CONTENT_TYPES_PART).unwrap().to_vec()).unwrap();
    assert!(types.contains("/xl/sharedStrings.xml"));

    let sheet = String::from_utf8(package.part("xl/worksheets/sheet1.xml").unwrap().to_vec()).unwrap();
    assert!(sheet.contains(r#"<c r="A2"><v>12.5</v></c>"#));
    assert!(sheet.contains(r#"<c r="B2"><v>45306</v></c>"#));
    assert!(sheet.contains(r#"<c r="C2" t="b"><v>1</v></c>"#));
    assert!(sheet.contains(r#"<c r="D2" t="s"><v>0</v></c>"#));
    assert!(sheet.contains(r#"<dimension ref="A1:D2"/>"#));

    let wb = WorkbookTemplate::open(&saved).unwrap();
    assert_eq!(text(&wb, 0, "D2").as_deref(), Some("Bob"));
    assert_eq!(text(&wb, 0, "C2").as_deref(), Some("TRUE"));
}

#[test]
fn test_force_recalculation_flag() {
    let bytes = build_xlsx(&[SheetSpec { name: "S", rows: "" }], None, false);
    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    assert!(!wb.force_formula_recalculation());

    wb.set_force_formula_recalculation();
    let wb = reopen(&mut wb);
    assert!(wb.force_formula_recalculation());

    let xml = String::from_utf8(wb.package().part("xl/workbook.xml").unwrap().to_vec()).unwrap();
    assert!(xml.contains(r#"</sheets><calcPr fullCalcOnLoad="1"/></workbook>"#));
}

#[test]
fn test_overwriting_a_formula_drops_the_calc_chain() {
    let bytes = build_xlsx(
        &[SheetSpec {
            name: "S",
            rows: r#"<row r="1"><c r="A1"><v>1</v></c><c r="B1"><f>A1*2</f><v>2</v></c></row>"#,
        }],
        Some(&[]),
        true,
    );

    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    write_value(&mut wb.cell_writer(0, CellAddress::new(0, 1)).unwrap(), "5");

    let package = Package::from_bytes(&wb.to_bytes().unwrap()).unwrap();
    assert!(!package.has_part("xl/calcChain.xml"));
    let rels = package.relationships("xl/workbook.xml").unwrap();
    assert!(rels.iter().all(|r| !r.rel_type.ends_with("/calcChain")));
}

#[test]
fn test_sheet_lookup_and_row_styles() {
    let bytes = build_xlsx(
        &[
            SheetSpec { name: "First", rows: "" },
            SheetSpec {
                name: "Orders",
                rows: r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row><row r="2" ht="22" customHeight="1"><c r="A2" s="3"/><c r="B2" s="4"/></row>"#,
            },
        ],
        Some(&["Name", "Qty"]),
        false,
    );

    let mut wb = WorkbookTemplate::open(&bytes).unwrap();
    assert_eq!(wb.sheet_index("orders"), Some(1));
    assert_eq!(wb.sheet_index("missing"), None);
    assert_eq!(wb.sheet(1).unwrap().last_cell_num(0), 2);

    wb.copy_row_style(1, 1, 4, 2).unwrap();
    let wb = reopen(&mut wb);
    let sheet = wb.sheet(1).unwrap();
    assert_eq!(sheet.row(4).unwrap().attr("ht"), Some("22"));
    assert_eq!(sheet.cell(CellAddress::new(4, 1)).unwrap().attr("s"), Some("4"));
}
