//! Placeholder tokens and literal substitution
//!
//! A placeholder token is a field name wrapped in a delimiter pair, e.g.
//! `${Name}` in spreadsheet templates or `«Name»` in document templates.
//! Substitution is a literal substring replace: values are inserted verbatim
//! and delimiter characters inside values are never escaped.

use std::borrow::Cow;

use crate::record::RecordMap;

/// An opening/closing delimiter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    /// Text preceding the field name
    pub open: String,
    /// Text following the field name
    pub close: String,
}

impl Delimiters {
    /// Create a delimiter pair
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `${` / `}`, used by spreadsheet templates
    pub fn dollar_brace() -> Self {
        Self::new("${", "}")
    }

    /// `«` / `»`, used by document templates
    pub fn guillemets() -> Self {
        Self::new("«", "»")
    }
}

/// Builds and replaces placeholder tokens for one template kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTokenizer {
    delimiters: Delimiters,
}

impl PlaceholderTokenizer {
    /// Create a tokenizer for a delimiter pair
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    /// The delimiter pair in use
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// The token for a field name: `open + name + close`
    pub fn token(&self, name: &str) -> String {
        let mut token =
            String::with_capacity(self.delimiters.open.len() + name.len() + self.delimiters.close.len());
        token.push_str(&self.delimiters.open);
        token.push_str(name);
        token.push_str(&self.delimiters.close);
        token
    }

    /// Replace every token of every key in `data` with its value.
    ///
    /// Keys are applied in the map's insertion order. When one key's token
    /// contains another key's token, whichever is applied first wins; template
    /// authors must avoid such names. Returns the input unchanged (borrowed)
    /// when nothing was replaced.
    ///
    /// ```
    /// use stencil_core::{Delimiters, PlaceholderTokenizer, RecordMap};
    ///
    /// let tokens = PlaceholderTokenizer::new(Delimiters::dollar_brace());
    /// let data = RecordMap::from_row(&["Name"], &["Alice"]);
    /// assert_eq!(tokens.substitute("Hello ${Name}", &data), "Hello Alice");
    /// ```
    pub fn substitute<'a>(&self, text: &'a str, data: &RecordMap) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);
        if text.is_empty() || !text.contains(self.delimiters.open.as_str()) {
            return result;
        }

        for (name, value) in data.iter() {
            let token = self.token(name);
            if result.contains(token.as_str()) {
                result = Cow::Owned(result.replace(token.as_str(), value));
            }
        }
        result
    }

    /// Field names of all well-formed tokens in `text`, in order of appearance
    pub fn find_tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let open = self.delimiters.open.as_str();
        let close = self.delimiters.close.as_str();
        let mut names = Vec::new();
        let mut rest = text;

        while let Some(start) = rest.find(open) {
            let after = &rest[start + open.len()..];
            match after.find(close) {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + close.len()..];
                }
                None => break,
            }
        }
        names
    }
}

/// Strip one leading and one trailing character (the wrapping delimiters of a
/// document table header cell, e.g. `«Name»` -> `Name`).
///
/// Returns `None` when the text is shorter than two characters.
pub fn strip_wrapping(text: &str) -> Option<&str> {
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    let (last_start, _) = chars.next_back()?;
    Some(&text[first.len_utf8()..last_start])
}
