//! Paragraph text and run rebuilding

use stencil_opc::{XmlElement, XmlNode};

use crate::names::WordNames;

/// Visible text of a paragraph.
///
/// Text of every run is concatenated, including runs nested in hyperlinks,
/// smart tags, tracked insertions and simple fields. `w:tab` reads as `\t`,
/// `w:br` and `w:cr` as `\n`. Deleted text (`w:delText`) is not visible.
pub fn paragraph_text(paragraph: &XmlElement, names: &WordNames) -> String {
    let mut out = String::new();
    collect_runs_text(paragraph, names, &mut out);
    out
}

fn collect_runs_text(parent: &XmlElement, names: &WordNames, out: &mut String) {
    for child in parent.elements() {
        if child.name == names.r {
            run_text(child, names, out);
        } else if names.is_run_container(&child.name) {
            collect_runs_text(child, names, out);
        }
    }
}

fn run_text(run: &XmlElement, names: &WordNames, out: &mut String) {
    for child in run.elements() {
        if child.name == names.t {
            out.push_str(&child.text());
        } else if child.name == names.tab {
            out.push('\t');
        } else if child.name == names.br || child.name == names.cr {
            out.push('\n');
        }
    }
}

/// Remove every run of a paragraph, including run containers. Paragraph
/// properties, bookmarks and other markers stay.
pub fn clear_runs(paragraph: &mut XmlElement, names: &WordNames) {
    paragraph.retain_children(|node| match node {
        XmlNode::Element(e) => e.name != names.r && !names.is_run_container(&e.name),
        _ => true,
    });
}

/// Build a run holding `text`, with optional run properties.
///
/// Tabs and line breaks become `w:tab` / `w:br` so the run reads back as
/// the same text. Other control characters cannot be stored in XML and are
/// dropped.
pub fn text_run(text: &str, properties: Option<XmlElement>, names: &WordNames) -> XmlElement {
    let mut run = XmlElement::new(names.r.as_str());
    if let Some(rpr) = properties {
        run.push_child(rpr);
    }

    let mut segment = String::new();
    let flush = |segment: &mut String, run: &mut XmlElement| {
        if !segment.is_empty() {
            run.push_child(
                XmlElement::new(names.t.as_str())
                    .with_attr("xml:space", "preserve")
                    .with_text(std::mem::take(segment)),
            );
        }
    };

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {
                flush(&mut segment, &mut run);
                run.push_child(XmlElement::new(names.tab.as_str()));
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush(&mut segment, &mut run);
                run.push_child(XmlElement::new(names.br.as_str()));
            }
            // Not allowed anywhere in XML 1.0
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => segment.push(ch),
        }
    }
    flush(&mut segment, &mut run);

    // An empty run still carries an empty text element
    if run.elements().all(|e| e.name == names.r_pr) {
        run.push_child(XmlElement::new(names.t.as_str()).with_attr("xml:space", "preserve"));
    }
    run
}

/// Replace a paragraph's runs with one plain run holding `text`
pub fn set_plain_text(paragraph: &mut XmlElement, text: &str, names: &WordNames) {
    clear_runs(paragraph, names);
    paragraph.push_child(text_run(text, None, names));
}

/// Larger font size applied when a paragraph's original text is exactly
/// `literal` (e.g. a price line).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Emphasis {
    /// Original paragraph text that triggers the emphasis
    pub literal: String,
    /// Font size in points
    pub size_pt: u32,
}

impl Default for Emphasis {
    fn default() -> Self {
        Self {
            literal: "«Price»".to_string(),
            size_pt: 28,
        }
    }
}

/// How a paragraph whose text changed is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParagraphRewrite {
    /// Drop every run and write the new text as a single bold run. Per-run
    /// formatting of the original paragraph is lost.
    #[default]
    Uniform,
}

impl ParagraphRewrite {
    /// Rebuild `paragraph` so that it reads `replaced`.
    ///
    /// `original` is the paragraph text before substitution, checked against
    /// the emphasis literal.
    pub fn apply(
        self,
        paragraph: &mut XmlElement,
        original: &str,
        replaced: &str,
        emphasis: &Emphasis,
        names: &WordNames,
    ) {
        match self {
            ParagraphRewrite::Uniform => {
                let mut rpr = XmlElement::new(names.r_pr.as_str()).with_child(XmlElement::new(names.b.as_str()));
                if original == emphasis.literal {
                    let half_points = emphasis.size_pt.saturating_mul(2).to_string();
                    rpr.push_child(XmlElement::new(names.sz.as_str()).with_attr(&names.val, half_points.as_str()));
                    rpr.push_child(XmlElement::new(names.sz_cs.as_str()).with_attr(&names.val, half_points));
                }
                clear_runs(paragraph, names);
                paragraph.push_child(text_run(replaced, Some(rpr), names));
            }
        }
    }
}
