//! Case-insensitive record maps built from CSV rows

use std::collections::HashMap;

/// A case-insensitive `name -> value` view of one data row.
///
/// Names keep the spelling of their first occurrence; a later duplicate
/// (compared case-insensitively) overwrites the value in place. Iteration
/// follows first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RecordMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a header to a data row.
    ///
    /// Blank header names are skipped. Positions past the end of `row` map to
    /// an empty string and values past the end of `header` are ignored, so
    /// this never fails on ragged input.
    ///
    /// ```
    /// use stencil_core::RecordMap;
    ///
    /// let map = RecordMap::from_row(&["Name", "Age"], &["Alice"]);
    /// assert_eq!(map.get("name"), Some("Alice"));
    /// assert_eq!(map.get("AGE"), Some(""));
    /// ```
    pub fn from_row<H, V>(header: &[H], row: &[V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::new();
        for (i, name) in header.iter().enumerate() {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            let value = row.get(i).map(AsRef::as_ref).unwrap_or("");
            map.insert(name, value);
        }
        map
    }

    /// Build a map from `(name, value)` pairs with the same rules as
    /// [`RecordMap::from_row`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            if name.as_ref().trim().is_empty() {
                continue;
            }
            map.insert(name.as_ref(), value);
        }
        map
    }

    /// Insert or overwrite a value. Returns the previous value, if any.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        let key = fold(name);
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((name.to_string(), value));
        None
    }

    /// Look up a value by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(&fold(name))
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Look up a value by name, resolving a missing name to `""`
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Check whether a name is present, ignoring case
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(&fold(name))
    }

    /// Iterate `(name, value)` pairs in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
