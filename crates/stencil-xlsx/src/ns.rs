//! SpreadsheetML namespaces, relationship types and element naming

use stencil_opc::XmlElement;

/// SpreadsheetML main namespace (transitional)
pub const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
/// SpreadsheetML main namespace (strict)
pub const SPREADSHEET_STRICT_NS: &str = "http://purl.oclc.org/ooxml/spreadsheetml/main";

pub const REL_WORKSHEET_SUFFIX: &str = "/worksheet";
pub const REL_SHARED_STRINGS_SUFFIX: &str = "/sharedStrings";
pub const REL_CALC_CHAIN_SUFFIX: &str = "/calcChain";

pub const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
pub const CT_SHARED_STRINGS: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";

/// Element name prefix (`""` or `"x:"`) used by a part's root element
pub(crate) fn element_prefix(root: &XmlElement) -> String {
    let bound = root
        .namespace_prefix(SPREADSHEET_NS)
        .or_else(|| root.namespace_prefix(SPREADSHEET_STRICT_NS));
    match bound {
        Some("") => String::new(),
        Some(prefix) => format!("{}:", prefix),
        None => match root.name.split_once(':') {
            Some((prefix, _)) => format!("{}:", prefix),
            None => String::new(),
        },
    }
}

/// Attribute value of a relationship id (`r:id`, whatever the prefix)
pub(crate) fn relationship_id(element: &XmlElement) -> Option<&str> {
    element
        .attributes
        .iter()
        .find(|(k, _)| k.ends_with(":id"))
        .map(|(_, v)| v.as_str())
}
