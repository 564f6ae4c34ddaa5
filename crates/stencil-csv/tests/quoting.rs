//! Property tests for the quoting rules of the line parser

use proptest::prelude::*;
use stencil_csv::{parse_line, CsvReader};

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

proptest! {
    /// Any field survives quoting, including separators and quotes
    #[test]
    fn quoted_fields_parse_back(fields in prop::collection::vec("[^\r\n]{0,12}", 1..6)) {
        let line = fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",");
        prop_assert_eq!(parse_line(&line, ','), fields);
    }

    /// Every physical line yields exactly one row before blank filtering
    #[test]
    fn one_row_per_line(lines in prop::collection::vec("[a-z,\"]{1,10}", 1..8)) {
        let text = format!("H\n{}", lines.join("\n"));
        let table = CsvReader::default().parse(&text);
        prop_assert!(table.row_count() <= lines.len());
        let non_blank = lines
            .iter()
            .filter(|l| parse_line(l, ',').iter().any(|f| !f.trim().is_empty()))
            .count();
        prop_assert_eq!(table.row_count(), non_blank);
    }
}
