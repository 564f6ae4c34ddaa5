//! WordprocessingML namespaces and qualified element names

use stencil_opc::XmlElement;

/// WordprocessingML main namespace (transitional)
pub const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// WordprocessingML main namespace (strict)
pub const WORD_STRICT_NS: &str = "http://purl.oclc.org/ooxml/wordprocessingml/main";

/// Qualified names of the elements a merge reads or writes, resolved once
/// against the prefix the document binds the main namespace to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNames {
    /// Document body `body`
    pub body: String,
    /// Paragraph `p`
    pub p: String,
    /// Run `r`
    pub r: String,
    /// Run properties `rPr`
    pub r_pr: String,
    /// Run text `t`
    pub t: String,
    /// Tab `tab`
    pub tab: String,
    /// Break `br`
    pub br: String,
    /// Carriage return `cr`
    pub cr: String,
    /// Bold `b`
    pub b: String,
    /// Font size `sz`, in half points
    pub sz: String,
    /// Complex script font size `szCs`
    pub sz_cs: String,
    /// The `val` attribute
    pub val: String,
    /// Table `tbl`
    pub tbl: String,
    /// Table row `tr`
    pub tr: String,
    /// Table cell `tc`
    pub tc: String,
    /// Containers whose runs belong to the paragraph text
    pub run_containers: [String; 5],
}

impl WordNames {
    /// Names for a given prefix (`""` or `"w:"`)
    pub fn with_prefix(prefix: &str) -> Self {
        let q = |local: &str| format!("{}{}", prefix, local);
        Self {
            body: q("body"),
            p: q("p"),
            r: q("r"),
            r_pr: q("rPr"),
            t: q("t"),
            tab: q("tab"),
            br: q("br"),
            cr: q("cr"),
            b: q("b"),
            sz: q("sz"),
            sz_cs: q("szCs"),
            val: q("val"),
            tbl: q("tbl"),
            tr: q("tr"),
            tc: q("tc"),
            run_containers: [
                q("hyperlink"),
                q("smartTag"),
                q("ins"),
                q("fldSimple"),
                q("customXml"),
            ],
        }
    }

    /// Names for a document root, defaulting to `w:`
    pub fn for_root(root: &XmlElement) -> Self {
        let bound = root
            .namespace_prefix(WORD_NS)
            .or_else(|| root.namespace_prefix(WORD_STRICT_NS));
        match bound {
            Some("") => Self::with_prefix(""),
            Some(prefix) => Self::with_prefix(&format!("{}:", prefix)),
            None => Self::with_prefix("w:"),
        }
    }

    pub(crate) fn is_run_container(&self, name: &str) -> bool {
        self.run_containers.iter().any(|c| c == name)
    }
}

impl Default for WordNames {
    fn default() -> Self {
        Self::with_prefix("w:")
    }
}
